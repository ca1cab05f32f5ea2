//! Character classification for the scanner.
//!
//! Long-operator characters may continue a symbol run; the short extras
//! (`=`, `.`, `^`, `?`) may only appear as the final character of a run,
//! which is how `:=` and `<=` terminate while `:` alone falls through to
//! punctuation.

pub(crate) fn is_white(ch: char) -> bool {
    ch.is_whitespace()
}

pub(crate) fn is_literal_bracket(ch: char) -> bool {
    ch == '\'' || ch == '"'
}

pub(crate) fn is_id_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub(crate) fn is_id_char(ch: char) -> bool {
    is_id_start(ch) || ch.is_ascii_digit()
}

pub(crate) fn is_long_operator_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | ':' | '+' | '-' | '*' | '/' | '&' | '~')
}

pub(crate) fn is_operator_char(ch: char) -> bool {
    is_long_operator_char(ch) || matches!(ch, '=' | '.' | '^' | '?')
}
