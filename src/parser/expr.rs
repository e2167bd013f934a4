//! Expression grammar (spec §4.6.5): a Pratt-style parser with only two
//! precedence levels, per the Open Question decision recorded in
//! `DESIGN.md` — every other infix operator is tokenised but rejected here
//! rather than silently accepted.

use crate::ast::{Expr, PrimitiveKind, TypeTable, TYPE_NOT_FOUND};
use crate::source::Location;
use crate::token::TokenKind;

use super::{PResult, Parser};

/// Wide/narrow boundary for char literals (spec §9 Open Questions: fixed at
/// 127 rather than a platform `CHAR_MAX`).
const CHAR_MAX: u16 = 127;

#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub(super) enum Prec {
    Lowest,
    Call,
}

impl<'a> Parser<'a> {
    /// The precedence of the current token in infix position. Everything but
    /// `(` (a function call) is `Lowest`, i.e. never taken as an infix op.
    fn infix_precedence(&self) -> Prec {
        if self.check(&TokenKind::LParen) {
            Prec::Call
        } else {
            Prec::Lowest
        }
    }

    pub(super) fn parse_expr(&mut self, types: &TypeTable, min: Prec) -> PResult<&'a Expr<'a>> {
        let mut left = self.parse_prefix(types)?;
        while self.infix_precedence() > min {
            left = self.parse_call(types, left)?;
        }
        Ok(left)
    }

    fn parse_prefix(&mut self, types: &TypeTable) -> PResult<&'a Expr<'a>> {
        let loc = self.current.loc;
        match self.current.kind.clone() {
            TokenKind::Integer(value) => {
                self.advance()?;
                let type_index = types.integer_literal_type(value);
                Ok(Expr::int(self.arena, loc, value, type_index))
            }
            TokenKind::Float(value) => {
                self.advance()?;
                Ok(Expr::float(self.arena, loc, value, types.builtin_type(PrimitiveKind::Float64)))
            }
            TokenKind::Char(code) => {
                self.advance()?;
                let wide = code > CHAR_MAX;
                let kind = if wide { PrimitiveKind::UInt16 } else { PrimitiveKind::Char };
                Ok(Expr::char_lit(self.arena, loc, code, wide, types.builtin_type(kind)))
            }
            TokenKind::String(bytes) => {
                self.advance()?;
                // spec §3.7/§9: string-literal type index is left unset in
                // this core — a later pass's job.
                Ok(Expr::string(self.arena, loc, bytes, TYPE_NOT_FOUND))
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Expr::bool_lit(self.arena, loc, true, types.builtin_type(PrimitiveKind::Bool)))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Expr::bool_lit(self.arena, loc, false, types.builtin_type(PrimitiveKind::Bool)))
            }
            TokenKind::Ident(name) => {
                self.advance()?;
                // No symbol table in this core (name resolution is a later
                // pass, spec §1 scope): an identifier's type is unresolved
                // here and fixed up downstream.
                Ok(Expr::ident(self.arena, loc, name, TYPE_NOT_FOUND))
            }
            TokenKind::Valof => self.parse_valof(types, loc),
            // `resultis EXPR` in expression position (spec §8 S5: a function
            // body written `= resultis EXPR` rather than `be { resultis EXPR }`).
            // Shares the same valof-result unification as the statement form
            // in `stmt.rs`; outside any `valof` it is a default-severity
            // diagnostic, not fatal, and evaluates to the inner expression.
            TokenKind::Resultis => {
                self.advance()?;
                let inner = self.parse_expr(types, Prec::Lowest)?;
                let (expr, had_valof) = self.unify_resultis(inner);
                if !had_valof {
                    self.default_diag(loc, "encountered `resultis` statement outside of `valof` expression");
                }
                Ok(expr)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_valof(&mut self, types: &TypeTable, loc: Location) -> PResult<&'a Expr<'a>> {
        self.advance()?; // `valof`
        self.enter_valof();
        let body = self.parse_statement(types);
        let type_index = self.exit_valof();
        let body = body?;
        Ok(Expr::valof(self.arena, loc, body, type_index))
    }

    fn parse_call(&mut self, types: &TypeTable, callee: &'a Expr<'a>) -> PResult<&'a Expr<'a>> {
        let loc = self.current.loc;
        self.expect(TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr(types, Prec::Lowest)?);
                if !self.match_kind(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(Expr::call(self.arena, loc, callee, args, TYPE_NOT_FOUND))
    }
}
