//! Quill IR - shared runtime types for the Quill interpreter.
//!
//! This crate is the leaf of the interpreter workspace: it owns the
//! interned-id newtypes, the insertion-ordered string registries, the
//! `Definitions` registry bundle shared by the lexer and the runtime, the
//! token type, the fixed reserved-word/operator tables, the shared output
//! sink, and the `Halt` abrupt-termination channel.
//!
//! Nothing here executes game logic. Higher layers (`quill_lexer`,
//! `quill_runtime`) depend on this crate; it depends on nothing above it.

mod definitions;
mod halt;
mod ids;
mod keyword;
mod output;
mod registry;
mod token;

pub use definitions::Definitions;
pub use halt::{Halt, RuntimeResult};
pub use ids::{Ident, ObjectId, RegistryId, TextId, Word};
pub use keyword::{operator_lookup, reserved_lookup, Oper, Reserved};
pub use output::OutputSink;
pub use registry::StringRegistry;
pub use token::Token;
