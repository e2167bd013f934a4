//! Section, declaration, and parameter grammar (spec §4.6.1-§4.6.3).

use crate::ast::{Decl, FunctionBody, Param, Section, TypeTable};
use crate::token::TokenKind;

use super::expr::Prec;
use super::types::insert_cast_if_needed;
use super::{PResult, Parser};

/// Which block keyword introduced a group of variable declarations
/// (spec §3.5): each uses the same `NAME [of TYPE] = EXPR [;]` grammar but
/// builds a different `DeclKind`.
#[derive(Clone, Copy)]
enum VarDeclKind {
    Global,
    Static,
    Manifest,
}

impl<'a> Parser<'a> {
    /// `section NAME [require ...] DECL*` (spec §4.6.1). A file is a sequence
    /// of these; `parse_file` loops calling this until EOF.
    pub(super) fn parse_section(&mut self, types: &TypeTable) -> PResult<Section<'a>> {
        self.expect(TokenKind::Section, "`section`")?;
        let (name, loc) = self.expect_ident("section name")?;
        let mut section = Section::new(name, loc);

        loop {
            match &self.current.kind {
                TokenKind::Require => self.parse_require(&mut section)?,
                TokenKind::Global => {
                    self.parse_block_decls(types, &mut section, VarDeclKind::Global)?
                }
                TokenKind::Static => {
                    self.parse_block_decls(types, &mut section, VarDeclKind::Static)?
                }
                TokenKind::Manifest => {
                    self.parse_block_decls(types, &mut section, VarDeclKind::Manifest)?
                }
                TokenKind::Let => {
                    let decl = self.parse_function_decl(types, false)?;
                    section.decls.push(decl);
                }
                TokenKind::And => {
                    let decl = self.parse_function_decl(types, true)?;
                    section.decls.push(decl);
                }
                TokenKind::Section | TokenKind::LexEof => break,
                _ => return Err(self.unexpected("a declaration")),
            }
        }

        Ok(section)
    }

    /// `require NAME (, NAME)*`. Required only to precede other declarations
    /// by convention (spec §3.5); violating it is a warning, not an error.
    fn parse_require(&mut self, section: &mut Section<'a>) -> PResult<()> {
        let loc = self.current.loc;
        self.expect(TokenKind::Require, "`require`")?;
        if !section.decls.is_empty() {
            self.warn(loc, "`require` after declarations in this section");
        }
        loop {
            let (name, _) = self.expect_ident("required section name")?;
            section.required.push(name);
            if !self.match_kind(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(())
    }

    fn parse_block_decls(
        &mut self,
        types: &TypeTable,
        section: &mut Section<'a>,
        kind: VarDeclKind,
    ) -> PResult<()> {
        let block_kw = match kind {
            VarDeclKind::Global => TokenKind::Global,
            VarDeclKind::Static => TokenKind::Static,
            VarDeclKind::Manifest => TokenKind::Manifest,
        };
        let what = match kind {
            VarDeclKind::Global => "`global`",
            VarDeclKind::Static => "`static`",
            VarDeclKind::Manifest => "`manifest`",
        };
        self.expect(block_kw, what)?;
        self.expect(TokenKind::LBrace, "`{`")?;
        while !self.check(&TokenKind::RBrace) && !self.at_eof() {
            let decl = self.parse_var_decl(types, kind)?;
            section.decls.push(decl);
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        Ok(())
    }

    /// `NAME [of TYPE] = EXPR [;]` (spec §4.6.2). When a declared type is
    /// present and differs from the initialiser's inferred type, the
    /// initialiser is wrapped in an implicit typecast (P7).
    fn parse_var_decl(&mut self, types: &TypeTable, kind: VarDeclKind) -> PResult<Decl<'a>> {
        let (name, loc) = self.expect_ident("declaration name")?;
        let declared_type = if self.match_kind(&TokenKind::Of)? {
            Some(self.parse_type_name(types)?)
        } else {
            None
        };
        self.expect(TokenKind::Eq, "`=`")?;
        let init = self.parse_expr(types, Prec::Lowest)?;

        let (type_index, init) = match declared_type {
            Some(t) => (t, insert_cast_if_needed(self.arena, t, init)),
            None => (init.type_index, init),
        };

        let _ = self.match_kind(&TokenKind::Semicolon)?;

        Ok(match kind {
            VarDeclKind::Global => Decl::global(loc, name, type_index, init),
            VarDeclKind::Static => Decl::static_decl(loc, name, type_index, init),
            VarDeclKind::Manifest => Decl::manifest(loc, name, type_index, init),
        })
    }

    /// `let NAME [( PARAM (, PARAM)* )] (be STMT | = EXPR [;])` (spec §4.6.3).
    /// `and` introduces a function into the same mutually recursive group as
    /// the preceding `let`.
    fn parse_function_decl(&mut self, types: &TypeTable, is_and: bool) -> PResult<Decl<'a>> {
        let loc = self.current.loc;
        if is_and {
            self.expect(TokenKind::And, "`and`")?;
        } else {
            self.expect(TokenKind::Let, "`let`")?;
        }
        let (name, _) = self.expect_ident("function name")?;

        let mut params = Vec::new();
        if self.match_kind(&TokenKind::LParen)? {
            if !self.check(&TokenKind::RParen) {
                loop {
                    params.push(self.parse_param(types)?);
                    if !self.match_kind(&TokenKind::Comma)? {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "`)`")?;
        }

        // required_params: the longest prefix with no default. A defaultless
        // param appearing later is still accepted (spec §4.6.3 is silent on
        // banning it) but flagged as a default-severity diagnostic.
        let mut required_params = params.len();
        let mut seen_default = false;
        for (i, p) in params.iter().enumerate() {
            if p.default.is_some() {
                if !seen_default {
                    required_params = i;
                    seen_default = true;
                }
            } else if seen_default {
                self.default_diag(p.loc, "default-less parameter follows a parameter with a default value");
            }
        }

        let (return_type, body) = if self.match_kind(&TokenKind::Be)? {
            let stmt = self.parse_statement(types)?;
            (types.builtin_type(crate::ast::PrimitiveKind::Unit), FunctionBody::Stmt(stmt))
        } else {
            self.expect(TokenKind::Eq, "`=`")?;
            let expr = self.parse_expr(types, Prec::Lowest)?;
            let _ = self.match_kind(&TokenKind::Semicolon)?;
            (expr.type_index, FunctionBody::Expr(expr))
        };

        Ok(Decl::function(loc, name, params, required_params, return_type, is_and, body))
    }

    /// `NAME [of TYPE] [= EXPR]` (spec §4.6.3). A param needs at least one of
    /// a declared type or a default to be typed; lacking both is a
    /// default-severity diagnostic and the param gets `TYPE_NOT_FOUND`.
    fn parse_param(&mut self, types: &TypeTable) -> PResult<Param<'a>> {
        let (name, loc) = self.expect_ident("parameter name")?;
        let declared_type = if self.match_kind(&TokenKind::Of)? {
            Some(self.parse_type_name(types)?)
        } else {
            None
        };
        let default = if self.match_kind(&TokenKind::Eq)? {
            let expr = self.parse_expr(types, Prec::Lowest)?;
            Some(match declared_type {
                Some(t) => insert_cast_if_needed(self.arena, t, expr),
                None => expr,
            })
        } else {
            None
        };

        if declared_type.is_none() && default.is_none() {
            self.default_diag(loc, "parameter has neither a declared type nor a default value");
        }

        let type_index = declared_type
            .or_else(|| default.map(|e| e.type_index))
            .unwrap_or(crate::ast::TYPE_NOT_FOUND);

        Ok(Param { loc, name, type_index, default })
    }
}
