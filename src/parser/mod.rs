//! Recursive-descent parser (spec §4.6): one-token lookahead over the
//! streaming lexer, building the AST and applying the primitive-type
//! inference / implicit-typecast policy of §4.7 as it goes.
//!
//! Grounded on `parser/mod.rs`'s `advance`/`peek`/`check`/`consume`
//! primitive-operation shape (that parser works over a pre-tokenized
//! `Vec<Token>`; this one stays streaming, pulling one token at a time from
//! the lexer, since spec §4.6 states the parser's own holdings as "current
//! token, previous token, current file" rather than a token vector) and
//! `original_source/src/parser.c` for the exact grammar and type-inference
//! control flow this spec distills.

mod decl;
mod expr;
mod stmt;
mod types;

use crate::arena::Arena;
use crate::ast::{Program, TypeIndex};
use crate::diagnostics::{self, Fatal, Severity};
use crate::lexer::Lexer;
use crate::source::Location;
use crate::token::{Token, TokenKind};

pub(crate) type PResult<T> = Result<T, Fatal>;

/// One open `valof`'s result type: unset until its first `resultis` fixes it
/// (spec §4.7.2).
struct ValofFrame {
    type_index: Option<TypeIndex>,
}

pub struct Parser<'a> {
    arena: &'a Arena,
    lexer: Lexer<'a>,
    out: &'a mut dyn std::io::Write,
    previous: Token,
    current: Token,
    valof_stack: Vec<ValofFrame>,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Arena, mut lexer: Lexer<'a>, out: &'a mut dyn std::io::Write) -> Self {
        let bof = Lexer::bof_token(lexer.source_id());
        let current = lexer.next_token(&bof);
        Parser { arena, lexer, out, previous: bof, current, valof_stack: Vec::new() }
    }

    /// A file is a sequence of sections (spec §4.6.1).
    pub fn parse_file(&mut self, program: &mut Program<'a>) -> PResult<()> {
        while !self.at_eof() {
            let section = self.parse_section(&program.types)?;
            program.push_section(section);
        }
        Ok(())
    }

    fn at_eof(&self) -> bool {
        self.current.is_eof()
    }

    /// Discriminant-only comparison: ignores payload, matching the teacher's
    /// `check`/`std::mem::discriminant` pattern for kinds that carry data.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    /// Advances past the current token. A `LEX_ERROR` current token is
    /// upgraded to a fatal diagnostic the moment anything would consume it
    /// (spec §4.5.8, §4.6: "if it is LEX_ERROR, raise a fatal diagnostic").
    fn advance(&mut self) -> PResult<()> {
        if let TokenKind::LexError(msg) = &self.current.kind {
            let msg = msg.clone();
            let loc = self.current.loc;
            return Err(self.fatal(loc, &msg));
        }
        let next = self.lexer.next_token(&self.current);
        self.previous = std::mem::replace(&mut self.current, next);
        Ok(())
    }

    /// If the current token's kind (by discriminant) matches, advances and
    /// returns `true`; otherwise leaves the parser untouched.
    fn match_kind(&mut self, kind: &TokenKind) -> PResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// `consume(expected, message)`: asserts the current kind then advances;
    /// on mismatch raises a fatal diagnostic distinguishing EOF from any
    /// other unexpected token (spec §4.6).
    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(&kind) {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<(String, Location)> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let loc = self.current.loc;
                self.advance()?;
                Ok((name, loc))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn unexpected(&mut self, what: &str) -> Fatal {
        let loc = self.current.loc;
        if self.at_eof() {
            self.fatal(loc, &format!("unexpected end of file, expect {}", what))
        } else {
            self.fatal(loc, &format!("unexpected token, expect {}", what))
        }
    }

    fn fatal(&mut self, loc: Location, msg: &str) -> Fatal {
        match diagnostics::emit(&mut *self.out, self.lexer.file(), Severity::Fatal, loc, msg) {
            Ok(()) => Fatal,
            Err(f) => f,
        }
    }

    fn warn(&mut self, loc: Location, msg: &str) {
        let _ = diagnostics::emit(&mut *self.out, self.lexer.file(), Severity::Warning, loc, msg);
    }

    fn default_diag(&mut self, loc: Location, msg: &str) {
        let _ = diagnostics::emit(&mut *self.out, self.lexer.file(), Severity::Default, loc, msg);
    }

    fn enter_valof(&mut self) {
        self.valof_stack.push(ValofFrame { type_index: None });
    }

    fn exit_valof(&mut self) -> TypeIndex {
        self.valof_stack
            .pop()
            .and_then(|frame| frame.type_index)
            .unwrap_or(crate::ast::TYPE_NOT_FOUND)
    }

    /// spec §4.7.2: the first `resultis` inside a `valof` fixes its result
    /// type; later ones are wrapped in a typecast to match. Returns the
    /// (possibly wrapped) expression and whether an enclosing valof exists.
    fn unify_resultis(&mut self, expr: &'a crate::ast::Expr<'a>) -> (&'a crate::ast::Expr<'a>, bool) {
        match self.valof_stack.last_mut() {
            None => (expr, false),
            Some(frame) => match frame.type_index {
                None => {
                    frame.type_index = Some(expr.type_index);
                    (expr, true)
                }
                Some(target) => (types::insert_cast_if_needed(self.arena, target, expr), true),
            },
        }
    }
}
