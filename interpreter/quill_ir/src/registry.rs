//! Insertion-ordered string interning registry.
//!
//! Maps strings to stable dense ids and back. Insertion order defines ids:
//! the first distinct string interned in a fresh registry gets id 0, the
//! next gets 1, and so on. Interning the same string twice returns the same
//! id, and entries are never removed for the registry's lifetime.
//!
//! The runtime is single-threaded, so there is no sharding or locking here;
//! a plain map-plus-vector pair keeps ids dense and ordered.

use crate::RegistryId;
use rustc_hash::FxHashMap;

/// String ↔ id interning table for one id space.
#[derive(Debug)]
pub struct StringRegistry<I> {
    map: FxHashMap<String, I>,
    strings: Vec<String>,
}

impl<I> Default for StringRegistry<I> {
    fn default() -> Self {
        StringRegistry {
            map: FxHashMap::default(),
            strings: Vec::new(),
        }
    }
}

impl<I: RegistryId> StringRegistry<I> {
    pub fn new() -> Self {
        StringRegistry::default()
    }

    /// Intern a string, returning its stable id.
    ///
    /// # Panics
    /// Panics if the registry exceeds `u32::MAX` entries.
    pub fn intern(&mut self, s: &str) -> I {
        if let Some(&id) = self.map.get(s) {
            return id;
        }
        let raw = u32::try_from(self.strings.len())
            .unwrap_or_else(|_| panic!("string registry exceeded {} entries", u32::MAX));
        let id = I::from_raw(raw);
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), id);
        id
    }

    /// Look up an id without interning. Returns `None` for unknown strings.
    #[inline]
    pub fn find(&self, s: &str) -> Option<I> {
        self.map.get(s).copied()
    }

    /// The string for an id.
    ///
    /// # Panics
    /// Panics if the id was not handed out by this registry (contract
    /// violation; ids are never removed, so a once-valid id stays valid).
    #[inline]
    pub fn lookup(&self, id: I) -> &str {
        &self.strings[id.raw() as usize]
    }

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        (id.raw() as usize) < self.strings.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ident, Word};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn ids_follow_insertion_order() {
        let mut reg = StringRegistry::<Ident>::new();
        assert_eq!(reg.intern("foo"), Ident::from_raw(0));
        assert_eq!(reg.intern("bar"), Ident::from_raw(1));
        assert_eq!(reg.intern("baz"), Ident::from_raw(2));
    }

    #[test]
    fn interning_is_idempotent() {
        let mut reg = StringRegistry::<Word>::new();
        let a = reg.intern("north");
        let b = reg.intern("north");
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn find_never_interns() {
        let mut reg = StringRegistry::<Word>::new();
        assert_eq!(reg.find("open"), None);
        assert_eq!(reg.len(), 0);
        let id = reg.intern("open");
        assert_eq!(reg.find("open"), Some(id));
    }

    #[test]
    fn lookup_inverts_intern() {
        let mut reg = StringRegistry::<Ident>::new();
        let id = reg.intern("lantern");
        assert_eq!(reg.lookup(id), "lantern");
        assert!(reg.contains(id));
    }

    proptest! {
        #[test]
        fn intern_twice_same_id(s in ".*") {
            let mut reg = StringRegistry::<Ident>::new();
            let a = reg.intern(&s);
            let b = reg.intern(&s);
            prop_assert_eq!(a, b);
            prop_assert_eq!(reg.lookup(a), s.as_str());
        }

        #[test]
        fn distinct_strings_get_distinct_dense_ids(v in proptest::collection::hash_set("[a-z]{1,8}", 1..20)) {
            let mut reg = StringRegistry::<Word>::new();
            let ids: Vec<Word> = v.iter().map(|s| reg.intern(s)).collect();
            for (n, id) in ids.iter().enumerate() {
                prop_assert_eq!(id.raw() as usize, n);
            }
            prop_assert_eq!(reg.len(), v.len());
        }
    }
}
