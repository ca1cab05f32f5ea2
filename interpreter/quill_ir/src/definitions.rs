//! The shared interning registries.
//!
//! One `Definitions` value is created at startup, owned by the universe,
//! and passed by reference into the scanner and the value conversions.
//! There is deliberately no global instance.

use crate::{Ident, StringRegistry, TextId, Word};

/// The three process-wide interning registries.
#[derive(Debug, Default)]
pub struct Definitions {
    /// Identifiers; also the attribute key space.
    pub identifiers: StringRegistry<Ident>,
    /// Vocabulary words; also the message key space.
    pub vocabulary: StringRegistry<Word>,
    /// Text literals.
    pub text_literals: StringRegistry<TextId>,
}

impl Definitions {
    pub fn new() -> Self {
        Definitions::default()
    }
}
