//! The abrupt-termination channel.
//!
//! Exactly two things unwind the interpreter to the top level: a quit
//! request from the running game, and a fatal lexical error the scanner
//! cannot resynchronize past. Both travel as `Err(Halt)` through ordinary
//! `?` propagation; everything softer (missing attributes, failed
//! conversions, recoverable syntax errors) is an ordinary value or a
//! `false`/`None` result and never uses this channel.

use thiserror::Error;

/// A propagated unwind-to-top signal.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Halt {
    /// Player- or script-initiated exit. Not an error.
    #[error("Exiting.")]
    Quit,
    /// Unrecoverable lexical error; the diagnostic has already been written.
    #[error("fatal lexical error: {0}")]
    Fatal(String),
}

pub type RuntimeResult<T> = Result<T, Halt>;
