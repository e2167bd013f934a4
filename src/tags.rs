//! Compile-time conditional tag set (spec §3.3, §4.3).
//!
//! Reimplements `original_source/src/util.c`'s `string_list_add/remove/contains`
//! over owned Rust collections instead of a manually-doubled C array; the
//! ownership story ("`remove` returns the owned string for the caller to
//! free") is kept because the spec's directive handling (§4.5.6) still wants
//! to know whether a free-standing string came out of the set or was freshly
//! allocated.

use std::collections::HashSet;

/// The process-wide (for this compilation) set of active conditional tags.
/// Mutated only by the lexer's `$`-directive handling; read by nothing else.
#[derive(Debug, Default)]
pub struct TagSet {
    tags: HashSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        TagSet { tags: HashSet::new() }
    }

    pub fn seeded(names: impl IntoIterator<Item = String>) -> Self {
        TagSet { tags: names.into_iter().collect() }
    }

    /// Idempotent add: a no-op if the tag is already present.
    pub fn add(&mut self, name: String) {
        self.tags.insert(name);
    }

    /// Removes `name`, returning the owned string for the caller if present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.tags.take(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    /// `$$<id>` semantics: toggle membership. Returns whether the tag ended
    /// up present after the toggle.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.remove(name).is_some() {
            false
        } else {
            self.add(name.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_contains() {
        let mut tags = TagSet::new();
        tags.add("foo".to_string());
        assert!(tags.contains("foo"));
    }

    #[test]
    fn remove_returns_owned_string() {
        let mut tags = TagSet::new();
        tags.add("foo".to_string());
        assert_eq!(tags.remove("foo"), Some("foo".to_string()));
        assert!(!tags.contains("foo"));
    }

    #[test]
    fn remove_missing_returns_none() {
        let mut tags = TagSet::new();
        assert_eq!(tags.remove("foo"), None);
    }

    #[test]
    fn toggle_is_self_inverse() {
        // P4: toggle(name); toggle(name) restores prior membership.
        let mut tags = TagSet::new();
        let before = tags.contains("foo");
        tags.toggle("foo");
        tags.toggle("foo");
        assert_eq!(tags.contains("foo"), before);
    }

    #[test]
    fn toggle_adds_when_absent() {
        let mut tags = TagSet::new();
        assert!(tags.toggle("foo"));
        assert!(tags.contains("foo"));
    }

    #[test]
    fn toggle_removes_when_present() {
        let mut tags = TagSet::new();
        tags.add("foo".to_string());
        assert!(!tags.toggle("foo"));
        assert!(!tags.contains("foo"));
    }

    #[test]
    fn seeded_from_cli_flags() {
        let tags = TagSet::seeded(["debug".to_string(), "x86".to_string()]);
        assert!(tags.contains("debug"));
        assert!(tags.contains("x86"));
        assert_eq!(tags.len(), 2);
    }
}
