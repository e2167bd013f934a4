//! Declarations, parameters, and sections (spec §3.5, §3.6).

use crate::source::Location;

use super::expr::Expr;
use super::stmt::Stmt;
use super::types::TypeIndex;

pub struct Param<'a> {
    pub loc: Location,
    pub name: String,
    pub type_index: TypeIndex,
    pub default: Option<&'a Expr<'a>>,
}

pub enum FunctionBody<'a> {
    Stmt(&'a Stmt<'a>),
    Expr(&'a Expr<'a>),
}

pub struct Decl<'a> {
    pub loc: Location,
    pub name: String,
    pub is_public: bool,
    pub kind: DeclKind<'a>,
}

pub enum DeclKind<'a> {
    Global { type_index: TypeIndex, init: &'a Expr<'a> },
    Static { type_index: TypeIndex, init: &'a Expr<'a> },
    Manifest { type_index: TypeIndex, init: &'a Expr<'a> },
    Function {
        params: Vec<Param<'a>>,
        required_params: usize,
        return_type: TypeIndex,
        /// Set when the function was introduced by `and` rather than `let`
        /// (spec §3.6: part of a mutually recursive group).
        tailcall_recursive: bool,
        body: FunctionBody<'a>,
    },
}

impl<'a> Decl<'a> {
    pub fn global(loc: Location, name: String, type_index: TypeIndex, init: &'a Expr<'a>) -> Decl<'a> {
        Decl { loc, name, is_public: true, kind: DeclKind::Global { type_index, init } }
    }

    pub fn static_decl(loc: Location, name: String, type_index: TypeIndex, init: &'a Expr<'a>) -> Decl<'a> {
        Decl { loc, name, is_public: false, kind: DeclKind::Static { type_index, init } }
    }

    pub fn manifest(loc: Location, name: String, type_index: TypeIndex, init: &'a Expr<'a>) -> Decl<'a> {
        Decl { loc, name, is_public: false, kind: DeclKind::Manifest { type_index, init } }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn function(
        loc: Location,
        name: String,
        params: Vec<Param<'a>>,
        required_params: usize,
        return_type: TypeIndex,
        tailcall_recursive: bool,
        body: FunctionBody<'a>,
    ) -> Decl<'a> {
        Decl {
            loc,
            name,
            is_public: true,
            kind: DeclKind::Function { params, required_params, return_type, tailcall_recursive, body },
        }
    }
}

/// A top-level compilation unit: an identifier, a `require` list, and the
/// declarations parsed under it (spec §3.5).
pub struct Section<'a> {
    pub name: String,
    pub loc: Location,
    pub required: Vec<String>,
    pub decls: Vec<Decl<'a>>,
}

impl<'a> Section<'a> {
    pub fn new(name: String, loc: Location) -> Self {
        Section { name, loc, required: Vec::new(), decls: Vec::new() }
    }
}
