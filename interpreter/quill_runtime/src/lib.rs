//! Quill runtime - the object graph, value system, and message dispatch at
//! the heart of the Quill interpreter.
//!
//! # Architecture
//!
//! - [`Universe`]: owns the object arena, the interning registries, the
//!   identifier→object map, the execution-context stack, and the output
//!   sink. There is no global instance; one `Universe` is created at
//!   startup and passed by reference.
//! - [`Value`]: a closed tagged union over nine variants with an explicit
//!   conversion protocol. A failed conversion is `Value::Undefined`, never
//!   an error.
//! - [`Object`]: one node of the prototype graph. Parent links are plain
//!   ids, re-validated at every lookup, so a destroyed or demoted parent
//!   silently stops contributing attributes and methods.
//! - [`Context`]/[`ContextGuard`]: the `(self, sender, message, each)`
//!   bindings threaded through nested message sends, popped on every exit
//!   path by an RAII guard.
//! - [`Expression`]/[`Statement`]/[`ExpressionMaker`]: the seams to the
//!   external expression/statement layer. The core stores, retrieves, and
//!   invokes bodies; it never constructs them (except [`ValueExpression`]).

mod context;
mod expr;
mod object;
mod stack;
pub mod testing;
mod universe;
mod value;

pub use context::{Context, ContextGuard};
pub use expr::{
    Expression, ExpressionMaker, ExpressionPtr, Statement, StatementPtr, ValueExpression,
};
pub use object::Object;
pub use universe::Universe;
pub use value::Value;

// Re-export the shared leaf types so embedders need only this crate.
pub use quill_ir::{
    Definitions, Halt, Ident, ObjectId, OutputSink, Reserved, RuntimeResult, TextId, Word,
};
