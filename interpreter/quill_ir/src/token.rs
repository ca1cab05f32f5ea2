//! Lexical tokens.
//!
//! A token is a closed tagged value with structural equality: two tokens are
//! the same token exactly when their kind and payload match. Tokens are
//! immutable once produced; the scanner holds at most one unconsumed token
//! of lookahead.

use crate::{Definitions, Ident, Oper, Reserved, TextId, Word};
use std::fmt::Write as _;

/// One lexical token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Token {
    /// A reserved word.
    Reserved(Reserved),
    /// An identifier, interned in the identifier registry.
    Identifier(Ident),
    /// A symbolic or named operator.
    Operator(Oper),
    /// A single punctuation character (`:`, `(`, `,`, …).
    Punctuation(char),
    /// A non-negative integer literal.
    Numeric(i64),
    /// `"…"`-bracketed text, interned in the text-literal registry.
    TextLiteral(TextId),
    /// A `>> …` echo line, interned in the text-literal registry.
    QuoteLiteral(TextId),
    /// `'…'`-bracketed text, interned in the vocabulary registry.
    Message(Word),
    /// A significant newline or statement terminator.
    Newline,
}

impl Token {
    /// Render the token for a diagnostic, resolving interned payloads.
    pub fn describe(&self, defs: &Definitions) -> String {
        let mut out = String::new();
        match *self {
            Token::Reserved(word) => out.push_str(word.text()),
            Token::Identifier(id) => out.push_str(defs.identifiers.lookup(id)),
            Token::Operator(oper) => out.push_str(oper.text()),
            Token::Punctuation(ch) => {
                let _ = write!(out, "'{ch}'");
            }
            Token::Numeric(n) => {
                let _ = write!(out, "{n}");
            }
            Token::TextLiteral(id) => {
                let _ = write!(out, "\"{}\"", defs.text_literals.lookup(id));
            }
            Token::QuoteLiteral(id) => {
                let _ = write!(out, ">> {}", defs.text_literals.lookup(id));
            }
            Token::Message(word) => {
                let _ = write!(out, "'{}'", defs.vocabulary.lookup(word));
            }
            Token::Newline => out.push_str("newline"),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn equality_is_structural() {
        assert_eq!(Token::Numeric(5), Token::Numeric(5));
        assert_ne!(Token::Numeric(5), Token::Numeric(6));
        assert_ne!(Token::Punctuation(':'), Token::Operator(Oper::Assign));
        assert_eq!(
            Token::Reserved(Reserved::End),
            Token::Reserved(Reserved::End)
        );
    }

    #[test]
    fn describe_resolves_interned_payloads() {
        let mut defs = Definitions::new();
        let id = defs.identifiers.intern("lamp");
        let word = defs.vocabulary.intern("open");
        let text = defs.text_literals.intern("a dusty room");

        assert_eq!(Token::Identifier(id).describe(&defs), "lamp");
        assert_eq!(Token::Message(word).describe(&defs), "'open'");
        assert_eq!(
            Token::TextLiteral(text).describe(&defs),
            "\"a dusty room\""
        );
        assert_eq!(Token::Punctuation(':').describe(&defs), "':'");
        assert_eq!(Token::Newline.describe(&defs), "newline");
    }
}
