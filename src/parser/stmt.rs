//! Statement grammar (spec §4.6.6).

use crate::ast::{Stmt, TypeTable};
use crate::token::TokenKind;

use super::expr::Prec;
use super::{PResult, Parser};

impl<'a> Parser<'a> {
    pub(super) fn parse_statement(&mut self, types: &TypeTable) -> PResult<&'a Stmt<'a>> {
        if self.check(&TokenKind::LBrace) {
            self.parse_block(types)
        } else if self.check(&TokenKind::Resultis) {
            self.parse_resultis(types)
        } else {
            self.parse_expr_stmt(types)
        }
    }

    fn parse_block(&mut self, types: &TypeTable) -> PResult<&'a Stmt<'a>> {
        let loc = self.current.loc;
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            stmts.push(self.parse_statement(types)?);
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        Ok(Stmt::block(self.arena, loc, stmts))
    }

    /// `resultis EXPR [;]`: legal only inside a `valof` (spec §4.6.6, §4.7.2).
    /// Outside one it is a default-severity diagnostic, not fatal — the AST
    /// is still emitted with the expression as-is.
    fn parse_resultis(&mut self, types: &TypeTable) -> PResult<&'a Stmt<'a>> {
        let loc = self.current.loc;
        self.expect(TokenKind::Resultis, "`resultis`")?;
        let expr = self.parse_expr(types, Prec::Lowest)?;
        let (expr, had_valof) = self.unify_resultis(expr);
        if !had_valof {
            self.default_diag(loc, "encountered `resultis` statement outside of `valof` expression");
        }
        let _ = self.match_kind(&TokenKind::Semicolon)?;
        Ok(Stmt::resultis(self.arena, loc, expr))
    }

    fn parse_expr_stmt(&mut self, types: &TypeTable) -> PResult<&'a Stmt<'a>> {
        let loc = self.current.loc;
        let expr = self.parse_expr(types, Prec::Lowest)?;
        let _ = self.match_kind(&TokenKind::Semicolon)?;
        Ok(Stmt::expr_stmt(self.arena, loc, expr))
    }
}
