//! Test scaffolding: a minimal expression/statement layer.
//!
//! The real `make_expr`/`make_statement` constructors live outside this
//! core. This module supplies just enough of that seam to drive the
//! definition parser and message dispatch in tests and embedding harnesses:
//! one-token literal bodies, an echo statement, and a quit statement.

use crate::{
    ExpressionMaker, ExpressionPtr, Statement, StatementPtr, Universe, Value, ValueExpression,
};
use quill_ir::{Halt, OutputSink, Reserved, RuntimeResult, Token};
use quill_lexer::TokenStream;
use std::rc::Rc;

/// Builds one-token bodies: a literal expression per attribute, a literal
/// or echo statement per method.
pub struct LiteralMaker;

impl LiteralMaker {
    fn literal_value(token: Token, universe: &Universe) -> Option<Value> {
        Some(match token {
            Token::Numeric(n) => Value::Numeric(n),
            Token::TextLiteral(id) | Token::QuoteLiteral(id) => {
                Value::String(universe.definitions().text_literals.lookup(id).to_owned())
            }
            Token::Message(word) => Value::Message(word),
            Token::Identifier(id) => Value::Identifier(id),
            Token::Reserved(Reserved::True) => Value::Boolean(true),
            Token::Reserved(Reserved::False) => Value::Boolean(false),
            Token::Reserved(word) if word.is_constant() => Value::Reserved(word),
            _ => return None,
        })
    }
}

impl ExpressionMaker for LiteralMaker {
    fn make_expr(
        &mut self,
        tokens: &mut TokenStream,
        universe: &mut Universe,
    ) -> RuntimeResult<Option<ExpressionPtr>> {
        if !tokens.fetch(universe.definitions_mut())? {
            tokens.expect_general(universe.definitions(), "literal expression");
            tokens.stop_looking();
            return Ok(None);
        }
        match Self::literal_value(tokens.token(), universe) {
            Some(value) => Ok(Some(Rc::new(ValueExpression::new(value)))),
            None => {
                tokens.expect_general(universe.definitions(), "literal expression");
                tokens.stop_looking();
                Ok(None)
            }
        }
    }

    fn make_statement(
        &mut self,
        tokens: &mut TokenStream,
        universe: &mut Universe,
    ) -> RuntimeResult<Option<StatementPtr>> {
        if !tokens.fetch(universe.definitions_mut())? {
            tokens.expect_general(universe.definitions(), "literal statement");
            tokens.stop_looking();
            return Ok(None);
        }
        let token = tokens.token();
        if token == Token::Reserved(Reserved::Stop) {
            return Ok(Some(Rc::new(QuitStatement)));
        }
        if let Token::QuoteLiteral(id) | Token::TextLiteral(id) = token {
            let text = universe.definitions().text_literals.lookup(id).to_owned();
            return Ok(Some(Rc::new(EchoStatement::new(text))));
        }
        match Self::literal_value(token, universe) {
            Some(value) => Ok(Some(Rc::new(ValueStatement::new(value)))),
            None => {
                tokens.expect_general(universe.definitions(), "literal statement");
                tokens.stop_looking();
                Ok(None)
            }
        }
    }
}

/// Writes one line to the output sink; the method itself produces nothing.
pub struct EchoStatement {
    text: String,
}

impl EchoStatement {
    pub fn new(text: impl Into<String>) -> Self {
        EchoStatement { text: text.into() }
    }
}

impl Statement for EchoStatement {
    fn execute(&self, _universe: &mut Universe, output: &OutputSink) -> RuntimeResult<Value> {
        output.writeln(&self.text);
        Ok(Value::Undefined)
    }
}

/// Produces a fixed value without touching the output sink.
pub struct ValueStatement {
    value: Value,
}

impl ValueStatement {
    pub fn new(value: Value) -> Self {
        ValueStatement { value }
    }
}

impl Statement for ValueStatement {
    fn execute(&self, _universe: &mut Universe, _output: &OutputSink) -> RuntimeResult<Value> {
        Ok(self.value.clone())
    }
}

/// Raises the quit signal.
pub struct QuitStatement;

impl Statement for QuitStatement {
    fn execute(&self, _universe: &mut Universe, _output: &OutputSink) -> RuntimeResult<Value> {
        Err(Halt::Quit)
    }
}

/// Writes the current `self` id and message word to the output sink, to
/// observe the bindings in effect during dispatch.
pub struct ContextProbe;

impl Statement for ContextProbe {
    fn execute(&self, universe: &mut Universe, output: &OutputSink) -> RuntimeResult<Value> {
        let context = universe.current_context().clone();
        let message = match context.message {
            Some(word) => universe.definitions().vocabulary.lookup(word).to_owned(),
            None => "<none>".to_owned(),
        };
        output.writeln(&format!(
            "self={} message={message}",
            context.self_object.raw()
        ));
        Ok(Value::Undefined)
    }
}

/// A fixed-value expression body, shared with unit tests.
pub fn literal_expr(value: Value) -> ExpressionPtr {
    Rc::new(ValueExpression::new(value))
}
