//! Expression nodes (spec §3.7).

use crate::source::Location;

use super::types::TypeIndex;
use super::stmt::Stmt;
use crate::arena::Arena;

pub struct Expr<'a> {
    pub loc: Location,
    pub type_index: TypeIndex,
    pub kind: ExprKind<'a>,
}

pub enum ExprKind<'a> {
    Int(u64),
    Float(f64),
    /// `wide` mirrors the escape-resolution outcome (spec §3.7): true when
    /// the code point came from a `*#hhhh` escape and didn't fit in a plain
    /// byte, giving type UInt16 rather than Char.
    Char { code: u16, wide: bool },
    Str(Vec<u8>),
    Bool(bool),
    Ident(String),
    Typecast { target: TypeIndex, inner: &'a Expr<'a> },
    Valof(&'a Stmt<'a>),
    Call { callee: &'a Expr<'a>, args: Vec<&'a Expr<'a>> },
}

impl<'a> Expr<'a> {
    pub fn int(arena: &'a Arena, loc: Location, value: u64, type_index: TypeIndex) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Int(value) })
    }

    pub fn float(arena: &'a Arena, loc: Location, value: f64, type_index: TypeIndex) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Float(value) })
    }

    pub fn char_lit(arena: &'a Arena, loc: Location, code: u16, wide: bool, type_index: TypeIndex) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Char { code, wide } })
    }

    pub fn string(arena: &'a Arena, loc: Location, bytes: Vec<u8>, type_index: TypeIndex) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Str(bytes) })
    }

    pub fn bool_lit(arena: &'a Arena, loc: Location, value: bool, type_index: TypeIndex) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Bool(value) })
    }

    pub fn ident(arena: &'a Arena, loc: Location, name: String, type_index: TypeIndex) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Ident(name) })
    }

    pub fn typecast(arena: &'a Arena, loc: Location, target: TypeIndex, inner: &'a Expr<'a>) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index: target, kind: ExprKind::Typecast { target, inner } })
    }

    pub fn valof(arena: &'a Arena, loc: Location, body: &'a Stmt<'a>, type_index: TypeIndex) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Valof(body) })
    }

    pub fn call(
        arena: &'a Arena,
        loc: Location,
        callee: &'a Expr<'a>,
        args: Vec<&'a Expr<'a>>,
        type_index: TypeIndex,
    ) -> &'a Expr<'a> {
        arena.alloc(Expr { loc, type_index, kind: ExprKind::Call { callee, args } })
    }
}
