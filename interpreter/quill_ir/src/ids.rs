//! Interned-id newtypes.
//!
//! Each id space gets its own `u32` newtype so an attribute identifier can
//! never be confused with a vocabulary word or an object handle at compile
//! time. Ids are dense and insertion-ordered within their registry.

use std::fmt;

/// Ids handed out by a [`StringRegistry`](crate::StringRegistry).
///
/// Implemented by the registry-backed id types (`Ident`, `Word`, `TextId`).
/// `ObjectId` is an arena handle, not a registry id, and does not implement
/// this trait.
pub trait RegistryId: Copy + Eq {
    fn from_raw(raw: u32) -> Self;
    fn raw(self) -> u32;
}

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

id_newtype! {
    /// An interned identifier (also the key space for object attributes).
    Ident
}

id_newtype! {
    /// An interned vocabulary word (the key space for messages).
    Word
}

id_newtype! {
    /// An interned text literal.
    TextId
}

id_newtype! {
    /// A handle into the universe's object arena.
    ///
    /// Handles are assigned in allocation order and never reused. A handle
    /// may dangle after its object is destroyed; every dereference
    /// re-validates against the arena.
    ObjectId
}

impl RegistryId for Ident {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        Ident::from_raw(raw)
    }

    #[inline]
    fn raw(self) -> u32 {
        self.0
    }
}

impl RegistryId for Word {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        Word::from_raw(raw)
    }

    #[inline]
    fn raw(self) -> u32 {
        self.0
    }
}

impl RegistryId for TextId {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        TextId::from_raw(raw)
    }

    #[inline]
    fn raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn raw_round_trip() {
        let id = Ident::from_raw(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(Ident::from_raw(id.raw()), id);
    }

    #[test]
    fn distinct_spaces_do_not_unify() {
        // Same raw value, different types; this is a compile-time property,
        // the assertions just pin the raw payloads.
        assert_eq!(Word::from_raw(3).raw(), TextId::from_raw(3).raw());
    }

    #[test]
    fn debug_includes_type_name() {
        assert_eq!(format!("{:?}", ObjectId::from_raw(12)), "ObjectId(12)");
    }
}
