//! Command-line surface (spec §6.1). `clap`-derived, grounded on the
//! teacher's `#[derive(Parser)]` style; the flag set itself follows
//! `original_source/src/main.c`'s `getopt_long` table (`-o`, `-D`, `-h`),
//! with `-c`/`--shared` added per spec §6.1.

use std::path::PathBuf;

use clap::Parser;

const DEFAULT_OUTPUT: &str = "a.out";

#[derive(Parser)]
#[command(name = "bcplc")]
#[command(about = "Lexer and parser front end for a BCPL-derived systems language")]
#[command(version)]
pub struct Cli {
    /// Input source files; each must have extension `.bpp`. Emptiness is
    /// checked by the driver (a fatal diagnostic through the usual sink),
    /// not enforced here, so "no input files" renders like any other error.
    pub inputs: Vec<PathBuf>,

    /// Output file path.
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Seed a tag in the compile-time conditional tag set (repeatable).
    #[arg(short = 'D', value_name = "NAME")]
    pub tags: Vec<String>,

    /// Build an object file.
    #[arg(short = 'c', conflicts_with = "shared")]
    pub object: bool,

    /// Build a shared library.
    #[arg(long)]
    pub shared: bool,
}

impl Cli {
    pub fn build_kind(&self) -> BuildKind {
        if self.shared {
            BuildKind::Shared
        } else if self.object {
            BuildKind::Object
        } else {
            BuildKind::Executable
        }
    }
}

/// Consumed only by the (out-of-scope) codegen stage; recorded here so the
/// flag's meaning isn't lost between parsing and whichever pass reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    Executable,
    Object,
    Shared,
}
