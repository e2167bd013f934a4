//! Statement nodes (spec §3.8).

use crate::source::Location;

use super::expr::Expr;
use crate::arena::Arena;

pub struct Stmt<'a> {
    pub loc: Location,
    pub kind: StmtKind<'a>,
}

pub enum StmtKind<'a> {
    ExprStmt(&'a Expr<'a>),
    Block(Vec<&'a Stmt<'a>>),
    /// Legal only inside a `valof` (spec §3.8, §4.6.6); the parser rejects
    /// it elsewhere with a default-severity diagnostic, not a structural one.
    Resultis(&'a Expr<'a>),
}

impl<'a> Stmt<'a> {
    pub fn expr_stmt(arena: &'a Arena, loc: Location, expr: &'a Expr<'a>) -> &'a Stmt<'a> {
        arena.alloc(Stmt { loc, kind: StmtKind::ExprStmt(expr) })
    }

    pub fn block(arena: &'a Arena, loc: Location, stmts: Vec<&'a Stmt<'a>>) -> &'a Stmt<'a> {
        arena.alloc(Stmt { loc, kind: StmtKind::Block(stmts) })
    }

    pub fn resultis(arena: &'a Arena, loc: Location, expr: &'a Expr<'a>) -> &'a Stmt<'a> {
        arena.alloc(Stmt { loc, kind: StmtKind::Resultis(expr) })
    }
}
