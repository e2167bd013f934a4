//! AST model (spec §3.4-3.8, §4.4): tagged node families plus the program's
//! primitive type table. Every node family is a sum type carrying its own
//! location and (for expressions) type index, rather than a shared header
//! struct reached through pointer casts (spec §9 REDESIGN FLAGS).

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

pub use decl::{Decl, DeclKind, FunctionBody, Param, Section};
pub use expr::{Expr, ExprKind};
pub use stmt::{Stmt, StmtKind};
pub use types::{PrimitiveKind, TypeIndex, TypeRecord, TypeTable, TYPE_NOT_FOUND};

/// A whole compiled program: the ordered sections parsed so far, and the
/// type table every `TypeIndex` in this tree refers into (spec §3.4).
pub struct Program<'a> {
    pub sections: Vec<Section<'a>>,
    pub types: TypeTable,
}

impl<'a> Program<'a> {
    pub fn new() -> Self {
        Program { sections: Vec::new(), types: TypeTable::new() }
    }

    pub fn push_section(&mut self, section: Section<'a>) {
        self.sections.push(section);
    }
}

impl<'a> Default for Program<'a> {
    fn default() -> Self {
        Self::new()
    }
}
