//! Quill lexer - scanner for Quill source text.
//!
//! A hand-written finite-state scanner over one character of lookahead.
//! It produces [`quill_ir::Token`]s, interning identifiers, vocabulary
//! words, and text literals into the shared [`quill_ir::Definitions`]
//! registries as it goes.
//!
//! The scanner has three error tiers:
//! - comment/escape oddities: a positioned diagnostic, then carry on;
//! - unexpected tokens reported by callers: a positioned diagnostic and a
//!   `false`/`None` result, suppressed after [`TokenStream::stop_looking`];
//! - unterminated literals and unknown operators: one diagnostic and
//!   `Err(Halt::Fatal)` - the stream cannot resynchronize.

mod classify;
mod source;
mod stream;

pub use source::SourceText;
pub use stream::TokenStream;
