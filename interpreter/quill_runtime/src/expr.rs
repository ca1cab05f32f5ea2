//! Seams to the external expression/statement layer.
//!
//! Attribute bodies are expressions; method bodies are statements. The core
//! stores and invokes them as opaque values. Construction belongs to the
//! external `make_expr`/`make_statement` layer, which reaches the
//! definition parser through the [`ExpressionMaker`] trait.
//!
//! [`ValueExpression`] is the one concrete expression the core owns: the
//! write-through path of attribute assignment stores plain values, and a
//! plain value stored as an attribute body must still evaluate.

use crate::{Universe, Value};
use quill_ir::{OutputSink, RuntimeResult};
use quill_lexer::TokenStream;
use std::rc::Rc;

pub type ExpressionPtr = Rc<dyn Expression>;
pub type StatementPtr = Rc<dyn Statement>;

/// An attribute body.
pub trait Expression {
    fn evaluate(&self, universe: &mut Universe) -> RuntimeResult<Value>;
}

/// A method body. Executes against the shared output sink.
pub trait Statement {
    fn execute(&self, universe: &mut Universe, output: &OutputSink) -> RuntimeResult<Value>;
}

/// The external constructors for expression and statement bodies.
///
/// `None` signals a recoverable syntax failure with the diagnostic already
/// emitted through the token stream; `Err` carries a fatal halt through
/// untouched.
pub trait ExpressionMaker {
    fn make_expr(
        &mut self,
        tokens: &mut TokenStream,
        universe: &mut Universe,
    ) -> RuntimeResult<Option<ExpressionPtr>>;

    fn make_statement(
        &mut self,
        tokens: &mut TokenStream,
        universe: &mut Universe,
    ) -> RuntimeResult<Option<StatementPtr>>;
}

/// An expression that evaluates to an independent clone of a fixed value.
pub struct ValueExpression {
    value: Value,
}

impl ValueExpression {
    pub fn new(value: Value) -> Self {
        ValueExpression { value }
    }
}

impl Expression for ValueExpression {
    fn evaluate(&self, _universe: &mut Universe) -> RuntimeResult<Value> {
        Ok(self.value.clone())
    }
}
