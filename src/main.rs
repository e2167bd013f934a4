//! Entry point. The only place in the crate allowed to call
//! `std::process::exit` (spec §9 REDESIGN FLAGS: "fatal-exits-via-abort"
//! becomes a typed `Fatal` error the driver decides what to do with).

fn main() {
    if bcplc::run().is_err() {
        std::process::exit(1);
    }
}
