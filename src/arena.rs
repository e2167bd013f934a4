//! A single bump-allocation region backing every AST node built during one
//! parser run (spec §9 REDESIGN FLAGS: "pointer-based linked AST via raw
//! allocations" becomes "a single arena per parser run"). Generalized from
//! `arena.rs`'s `Arena<T>`, which ties one arena to one node type — this
//! AST has several node families (`Expr`, `Stmt`, `Decl`, `Param`) that all
//! need to share the same region, so `alloc`/`alloc_slice` are generic per
//! call instead of fixed at the struct level.

use bumpalo::Bump;

pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Self {
        Arena { bump: Bump::new() }
    }

    pub fn alloc<T>(&self, value: T) -> &T {
        self.bump.alloc(value)
    }

    pub fn alloc_slice<T, I>(&self, items: I) -> &[T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.bump.alloc_slice_fill_iter(items)
    }

    /// Invalidates all references but keeps allocated capacity, for reusing
    /// one arena across multiple files in a single compilation.
    pub fn reset(&mut self) {
        self.bump.reset();
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_stable_reference() {
        let arena = Arena::new();
        let r1 = arena.alloc(42i32);
        let r2 = arena.alloc("hello");
        assert_eq!(*r1, 42);
        assert_eq!(*r2, "hello");
    }

    #[test]
    fn alloc_slice_works() {
        let arena = Arena::new();
        let slice = arena.alloc_slice([1, 2, 3]);
        assert_eq!(slice, &[1, 2, 3]);
    }

    #[test]
    fn reset_allows_reuse() {
        let mut arena = Arena::new();
        {
            let r = arena.alloc(1i32);
            assert_eq!(*r, 1);
        }
        arena.reset();
        let r2 = arena.alloc(2i32);
        assert_eq!(*r2, 2);
    }
}
