//! Crate root: the lexer/parser front end plus the ambient stack (CLI,
//! diagnostics, styling) that wires it into a runnable binary (spec §1, §6).

pub mod arena;
pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod style;
pub mod suggest;
pub mod tags;
pub mod token;

use clap::Parser as _;

use arena::Arena;
use ast::Program;
use cli::Cli;
use diagnostics::{fatal_no_location, Fatal};
use lexer::Lexer;
use parser::Parser as BcplParser;
use source::{SourceFile, Sources};
use tags::TagSet;

/// Top-level driver (spec §6.1, §5, §1: "a whole program"): parses CLI args,
/// then lexes/parses each input file to completion before moving to the
/// next, accumulating every file's sections into one `Program` spanning the
/// whole compilation. The arena backing that `Program`'s AST nodes lives for
/// the entire run rather than per file — once a section is pushed it must
/// stay valid for every later file's parse, so nothing resets it mid-run
/// (spec §9: "single arena per parser run" scales here to "per compilation",
/// not per file). `Sources` holds every file touched so far, again for the
/// whole run, for the same reason. Returns on the first fatal diagnostic —
/// later compiler stages (name resolution, codegen) are out of scope and
/// never run.
pub fn run() -> Result<(), Fatal> {
    let cli = Cli::parse();
    let progname = std::env::args().next().unwrap_or_else(|| "bcplc".to_string());
    let mut stderr = std::io::stderr();

    if cli.inputs.is_empty() {
        return Err(fatal_no_location(&mut stderr, &progname, "no input files"));
    }

    let mut tags = TagSet::seeded(cli.tags.iter().cloned());
    let mut sources = Sources::new();
    let arena = Arena::new();
    let mut program = Program::new();

    for path in &cli.inputs {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("bpp") => {}
            _ => {
                let msg = format!("`{}`: unrecognized file extension", path.display());
                return Err(fatal_no_location(&mut stderr, &progname, &msg));
            }
        }

        let file = match SourceFile::open(path) {
            Ok(file) => file,
            Err(err) => {
                let msg = format!("cannot find `{}`: {}", path.display(), err);
                return Err(fatal_no_location(&mut stderr, &progname, &msg));
            }
        };
        let id = sources.add(file);

        let lexer = Lexer::new(id, sources.get_mut(id), &mut tags);
        let mut parser = BcplParser::new(&arena, lexer, &mut stderr);
        parser.parse_file(&mut program)?;
    }

    Ok(())
}
