//! The token stream.
//!
//! `fetch` advances to the next token, interning identifier/literal/message
//! text into the shared registries as it scans. One token may be pushed
//! back with `did_not_consume`, which gives callers single-token lookahead.
//! Newline significance is a caller-managed stack: inside bracketed
//! constructs newlines are whitespace, at statement level they terminate.
//!
//! The scan is a finite-state machine over one character of lookahead,
//! written as one decision loop plus a scan function per token family.

use crate::classify;
use crate::SourceText;
use quill_ir::{
    operator_lookup, reserved_lookup, Definitions, Halt, OutputSink, RuntimeResult, Token,
};
use smallvec::{smallvec, SmallVec};

/// Scanner state over a [`SourceText`].
#[derive(Debug)]
pub struct TokenStream {
    source: SourceText,
    token: Option<Token>,
    consumed: bool,
    keep_looking: bool,
    newline_significant: SmallVec<[bool; 4]>,
    diagnostics: OutputSink,
}

impl TokenStream {
    pub fn new(source: SourceText) -> Self {
        TokenStream {
            source,
            token: None,
            consumed: true,
            keep_looking: true,
            newline_significant: smallvec![false],
            diagnostics: OutputSink::Stdout,
        }
    }

    /// Redirect diagnostics (tests capture them in a buffer sink).
    pub fn set_diagnostics(&mut self, sink: OutputSink) {
        self.diagnostics = sink;
    }

    /// The current token.
    ///
    /// # Panics
    /// Panics if no token has been fetched yet (contract violation).
    pub fn token(&self) -> Token {
        match self.token {
            Some(token) => token,
            None => panic!("token() called before a successful fetch"),
        }
    }

    /// Push the current token back; the next `fetch` returns it unchanged.
    pub fn did_not_consume(&mut self) {
        self.consumed = false;
    }

    /// Whether physical newlines and `;` currently produce NEWLINE tokens.
    #[inline]
    pub fn is_newline_significant(&self) -> bool {
        self.newline_significant.last().copied().unwrap_or(false)
    }

    /// Enter a region where newlines are significant.
    pub fn consider_newlines(&mut self) {
        self.newline_significant.push(true);
    }

    /// Enter a region where newlines are whitespace.
    pub fn ignore_newlines(&mut self) {
        self.newline_significant.push(false);
    }

    /// Leave the innermost newline-significance region. The bottom of the
    /// stack is never popped.
    pub fn restore_newlines(&mut self) {
        if self.newline_significant.len() > 1 {
            self.newline_significant.pop();
        }
    }

    /// Advance to the next token. `Ok(true)` means a token was produced;
    /// `Ok(false)` means end of input; `Err` is a fatal lexical error with
    /// the diagnostic already written.
    pub fn fetch(&mut self, defs: &mut Definitions) -> RuntimeResult<bool> {
        // An unconsumed token is returned as-is, with one exception: newline
        // significance may have been switched off while a NEWLINE was held
        // back, in which case it must be replaced by a real token.
        if !self.consumed {
            self.consumed = true;
            let stale_newline =
                self.token == Some(Token::Newline) && !self.is_newline_significant();
            if !stale_newline {
                return Ok(true);
            }
        }

        loop {
            let Some(ch) = self.source.read_char() else {
                return Ok(false);
            };
            let token = if classify::is_white(ch) {
                if ch == '\n' && self.is_newline_significant() {
                    Token::Newline
                } else {
                    continue;
                }
            } else if ch == '#' {
                self.skip_comment();
                continue;
            } else if ch == ';' {
                // Statement terminator: a synonym for newline where that
                // matters, whitespace where it does not.
                if self.is_newline_significant() {
                    Token::Newline
                } else {
                    continue;
                }
            } else if classify::is_literal_bracket(ch) {
                self.scan_literal(defs, ch)?
            } else if classify::is_id_start(ch) {
                self.scan_identifier(defs, ch)
            } else if ch.is_ascii_digit() {
                self.scan_number(ch)
            } else if classify::is_operator_char(ch) {
                self.scan_operator(defs, ch)?
            } else {
                Token::Punctuation(ch)
            };
            self.token = Some(token);
            return Ok(true);
        }
    }

    /// Discard characters through end-of-line. The newline itself is
    /// consumed; a comment swallows its terminator.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.source.read_char() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// `"…"` or `'…'` bracketed text. `"` interns a text literal, `'`
    /// interns a vocabulary word (a message).
    fn scan_literal(&mut self, defs: &mut Definitions, bracket: char) -> RuntimeResult<Token> {
        let mut text = String::new();
        loop {
            let ch = match self.source.read_char() {
                None => return Err(self.fatal("Unterminated literal")),
                Some('\n') => {
                    // Point the diagnostic at the line that failed to close.
                    self.source.unread_char('\n');
                    return Err(self.fatal("Unterminated literal"));
                }
                Some(ch) => ch,
            };
            if ch == bracket {
                break;
            }
            if ch == '\\' {
                let Some(escaped) = self.source.read_char() else {
                    return Err(self.fatal("Unterminated literal"));
                };
                text.push(match escaped {
                    't' => '\t',
                    'b' => '\u{0008}',
                    'e' => '\u{001b}',
                    'n' => '\n',
                    other => {
                        self.soft_diagnostic("Unknown escape character");
                        other
                    }
                });
                continue;
            }
            text.push(ch);
        }
        Ok(match bracket {
            '"' => Token::TextLiteral(defs.text_literals.intern(&text)),
            _ => Token::Message(defs.vocabulary.intern(&text)),
        })
    }

    /// An identifier run, resolved against the reserved-word table, then
    /// the operator-name table, then interned as an identifier.
    fn scan_identifier(&mut self, defs: &mut Definitions, first: char) -> Token {
        let mut text = String::from(first);
        while let Some(ch) = self.source.read_char() {
            if classify::is_id_char(ch) {
                text.push(ch);
            } else {
                self.source.unread_char(ch);
                break;
            }
        }
        if let Some(word) = reserved_lookup(&text) {
            Token::Reserved(word)
        } else if let Some(oper) = operator_lookup(&text) {
            Token::Operator(oper)
        } else {
            Token::Identifier(defs.identifiers.intern(&text))
        }
    }

    /// A maximal digit run. Values beyond `i64` clamp to `i64::MAX` after
    /// one diagnostic; wrapping would silently corrupt the literal and the
    /// scanner has no fatal tier for well-formed digits.
    fn scan_number(&mut self, first: char) -> Token {
        let mut digits = String::from(first);
        while let Some(ch) = self.source.read_char() {
            if ch.is_ascii_digit() {
                digits.push(ch);
            } else {
                self.source.unread_char(ch);
                break;
            }
        }
        let mut value: i64 = 0;
        let mut clamped = false;
        for byte in digits.bytes() {
            let digit = i64::from(byte.wrapping_sub(b'0'));
            match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(next) => value = next,
                None => {
                    value = i64::MAX;
                    clamped = true;
                    break;
                }
            }
        }
        if clamped {
            self.soft_diagnostic("Numeric literal out of range; clamped");
        }
        Token::Numeric(value)
    }

    /// A symbol run. Long-operator characters accumulate; one trailing
    /// short character (`=`, `.`, `^`, `?`) may complete the run. The run
    /// `>>` stops short and opens a quoted-echo line instead. A bare `:`
    /// re-reads as punctuation. Anything unrecognized is fatal.
    fn scan_operator(&mut self, defs: &mut Definitions, first: char) -> RuntimeResult<Token> {
        let mut text = String::new();
        let mut next = Some(first);
        loop {
            match next {
                Some(ch) if classify::is_long_operator_char(ch) && text != ">>" => {
                    text.push(ch);
                    next = self.source.read_char();
                }
                _ => break,
            }
        }
        if text == ">>" {
            if let Some(ch) = next {
                self.source.unread_char(ch);
            }
            return Ok(self.scan_quote(defs));
        }
        match next {
            Some(ch) if classify::is_operator_char(ch) => text.push(ch),
            Some(ch) => self.source.unread_char(ch),
            None => {}
        }
        if text == ":" {
            return Ok(Token::Punctuation(':'));
        }
        match operator_lookup(&text) {
            Some(oper) => Ok(Token::Operator(oper)),
            None => Err(self.fatal(&format!("Unknown operator: {text}"))),
        }
    }

    /// The `>> …` echo form: the rest of the line, leading whitespace
    /// dropped, interned as a text literal. The newline stays in the stream
    /// for the next fetch.
    fn scan_quote(&mut self, defs: &mut Definitions) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.source.read_char() {
            if ch == '\n' {
                self.source.unread_char(ch);
                break;
            }
            text.push(ch);
        }
        Token::QuoteLiteral(defs.text_literals.intern(text.trim_start()))
    }

    /// Report "expected X; found <current token>" unless reporting has been
    /// suppressed.
    pub fn expect_general(&mut self, defs: &Definitions, expected: &str) {
        if !self.keep_looking {
            return;
        }
        let found = match self.token {
            Some(token) => token.describe(defs),
            None => "end of input".to_owned(),
        };
        let mut line = String::new();
        self.source.show_position(&mut line);
        line.push_str("Expected ");
        line.push_str(expected);
        line.push_str("; found ");
        line.push_str(&found);
        self.diagnostics.writeln(&line);
    }

    /// Report an expected specific token.
    pub fn expected(&mut self, defs: &Definitions, token: Token) {
        let description = token.describe(defs);
        self.expect_general(defs, &description);
    }

    /// Report a positioned message unless reporting has been suppressed.
    pub fn error_message(&mut self, message: &str) {
        if !self.keep_looking {
            return;
        }
        let mut line = String::new();
        self.source.show_position(&mut line);
        line.push_str(message);
        self.diagnostics.writeln(&line);
    }

    /// Suppress further diagnostics. Callers keep scanning structurally
    /// after the first real failure but stop reporting, so one mistake does
    /// not cascade into a wall of messages.
    pub fn stop_looking(&mut self) {
        self.keep_looking = false;
    }

    /// Fetch and require an exact token. On mismatch, reports, suppresses
    /// further diagnostics, and returns `Ok(false)`.
    pub fn insist_on(&mut self, defs: &mut Definitions, token: Token) -> RuntimeResult<bool> {
        if self.fetch(defs)? && self.token == Some(token) {
            return Ok(true);
        }
        self.expected(defs, token);
        self.stop_looking();
        Ok(false)
    }

    /// A scanner diagnostic that does not abort anything: positioned,
    /// written unconditionally.
    fn soft_diagnostic(&mut self, message: &str) {
        let mut line = String::new();
        self.source.show_position(&mut line);
        line.push_str(message);
        self.diagnostics.writeln(&line);
    }

    /// A fatal scanner error: one positioned diagnostic, then the stream is
    /// dead. The caller propagates the returned halt to the top level.
    fn fatal(&mut self, message: &str) -> Halt {
        let mut line = String::new();
        self.source.show_position(&mut line);
        line.push_str(message);
        self.diagnostics.writeln(&line);
        Halt::Fatal(message.to_owned())
    }
}

#[cfg(test)]
mod tests;
