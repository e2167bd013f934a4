//! Diagnostics (spec §3.1 locations, §4.2, §7): a located, severity-tagged
//! message with a caret-underline renderer. Grounded on
//! `original_source/src/context.c::print_compiler_error` (colored severity
//! labels, `N | source line`, caret underline, "compilation terminated." on
//! fatal) and `error.rs`'s `display_with_source`/typo-suggestion pairing.

use crate::source::{Location, SourceFile};
use crate::style::Style;
use crate::suggest::{find_similar, KNOWN_WORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Default,
    Fatal,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Default | Severity::Fatal => "error",
        }
    }

    fn colored_label(self) -> String {
        match self {
            Severity::Info => Style::cyan("info"),
            Severity::Warning => Style::yellow("warn"),
            Severity::Default | Severity::Fatal => Style::bold_red("error"),
        }
    }

    pub fn is_fatal(self) -> bool {
        self == Severity::Fatal
    }
}

/// Marker error returned by `emit` when a fatal diagnostic was raised. Only
/// the top-level driver (`main.rs`) is allowed to turn this into a process
/// exit (spec §9 REDESIGN FLAGS: "fatal-exits-via-abort" becomes a typed
/// error the driver decides what to do with).
#[derive(Debug, Clone, Copy)]
pub struct Fatal;

/// Renders one diagnostic to `out` and returns `Err(Fatal)` iff `severity`
/// is fatal. Does not print "compilation terminated." itself — the driver
/// does that once, after catching `Fatal`, matching the original's single
/// trailing line rather than repeating it per diagnostic.
///
/// Takes the single `SourceFile` the location belongs to rather than a whole
/// `Sources` registry: spec §5 lexes and parses one file to completion
/// before starting the next, so the lexer/parser only ever have one file's
/// worth of line data to render against, and passing it directly avoids a
/// second borrow of the registry the lexer is already holding mutably.
pub fn emit(
    out: &mut impl std::io::Write,
    file: &SourceFile,
    severity: Severity,
    loc: Location,
    message: &str,
) -> Result<(), Fatal> {
    let (line_text, line_start) = file.line_containing(loc.offset);
    let col = loc.offset.saturating_sub(line_start);
    let width = loc.width.max(1) as usize;

    let _ = writeln!(
        out,
        "{} {}:{}:{}: {}",
        Style::bold(&format!("[{}]", severity.label())),
        file.path.display(),
        loc.line,
        col,
        severity.colored_label(),
    );
    let _ = writeln!(out, "  {}", message);
    let _ = writeln!(out, "{:>5} {} {}", loc.line, Style::dim("|"), line_text);
    let underline = format!("{}{}", " ".repeat(col), "^".repeat(width));
    let _ = writeln!(out, "      {} {}", Style::dim("|"), Style::red(&underline));

    if let Some(word) = extract_word(line_text, col, width) {
        if let Some(suggestion) = find_similar(word, KNOWN_WORDS, 2) {
            let _ = writeln!(
                out,
                "      {} {}: did you mean `{}`?",
                Style::dim("|"),
                Style::cyan("help"),
                Style::bold(suggestion)
            );
        }
    }
    let _ = writeln!(out);

    if severity.is_fatal() {
        Err(Fatal)
    } else {
        Ok(())
    }
}

/// A fatal error with no source location: "no input files", a missing file,
/// an unrecognized extension. Grounded on `original_source/src/main.c`'s
/// `fatal_error` (progname-prefixed, one line, "compilation terminated."),
/// which the original keeps separate from `print_compiler_error` for exactly
/// this reason — there is no source line to show a caret under.
pub fn fatal_no_location(out: &mut impl std::io::Write, progname: &str, message: &str) -> Fatal {
    let _ = writeln!(
        out,
        "{}: {} {}",
        Style::bold(progname),
        Style::bold_red("fatal error:"),
        message
    );
    let _ = writeln!(out, "compilation terminated.");
    Fatal
}

fn extract_word(line: &str, col: usize, width: usize) -> Option<&str> {
    let bytes = line.as_bytes();
    if col + width > bytes.len() {
        return None;
    }
    let word = &line[col..col + width];
    if !word.is_empty() && word.chars().all(|c| c.is_alphanumeric()) {
        Some(word)
    } else {
        None
    }
}
