//! Type-name resolution (spec §4.6.4) and the shared implicit-typecast
//! insertion rule used by declarations, parameters, and `resultis` (§4.7).

use crate::arena::Arena;
use crate::ast::{Expr, TypeIndex, TypeTable, TYPE_NOT_FOUND};

use super::{PResult, Parser};

impl<'a> Parser<'a> {
    /// Only identifier types exist in this core. A primitive spelling
    /// resolves to its builtin index; anything else is a default-severity
    /// diagnostic (not fatal — parsing continues with `TYPE_NOT_FOUND`).
    pub(super) fn parse_type_name(&mut self, types: &TypeTable) -> PResult<TypeIndex> {
        let (name, loc) = self.expect_ident("type name")?;
        match types.lookup_name(&name) {
            Some(index) => Ok(index),
            None => {
                self.default_diag(loc, &format!("unknown type `{}`", name));
                Ok(TYPE_NOT_FOUND)
            }
        }
    }
}

/// Wraps `expr` in a typecast to `target` when its inferred type differs,
/// otherwise returns it unchanged (spec §4.6.2/§4.6.3/§4.7.2, P7).
pub(super) fn insert_cast_if_needed<'a>(
    arena: &'a Arena,
    target: TypeIndex,
    expr: &'a Expr<'a>,
) -> &'a Expr<'a> {
    if expr.type_index == target {
        expr
    } else {
        Expr::typecast(arena, expr.loc, target, expr)
    }
}
