use super::*;
use pretty_assertions::assert_eq;
use quill_ir::{Ident, Oper, Reserved, TextId, Word};

fn stream(input: &str) -> (TokenStream, Definitions, OutputSink) {
    let mut t = TokenStream::new(SourceText::new("<test>", input));
    let sink = OutputSink::buffer();
    t.set_diagnostics(sink.clone());
    (t, Definitions::new(), sink)
}

/// Scan the whole input, panicking on fatal errors.
fn tokens_of(input: &str, newlines_significant: bool) -> (Vec<Token>, Definitions) {
    let (mut t, mut defs, _sink) = stream(input);
    if newlines_significant {
        t.consider_newlines();
    }
    let mut out = Vec::new();
    while t.fetch(&mut defs).expect("no fatal error expected") {
        out.push(t.token());
    }
    (out, defs)
}

#[test]
fn attribute_line_with_significant_newline() {
    let (tokens, defs) = tokens_of("abc : 5\n", true);
    assert_eq!(
        tokens,
        vec![
            Token::Identifier(defs.identifiers.find("abc").unwrap()),
            Token::Punctuation(':'),
            Token::Numeric(5),
            Token::Newline,
        ]
    );
}

#[test]
fn escape_table_applies_inside_text_literals() {
    let (tokens, defs) = tokens_of("\"a\\tb\"", false);
    let id = match tokens[..] {
        [Token::TextLiteral(id)] => id,
        ref other => panic!("expected one text literal, got {other:?}"),
    };
    assert_eq!(defs.text_literals.lookup(id), "a\tb");
    assert_eq!(defs.text_literals.lookup(id).chars().count(), 3);
}

#[test]
fn unknown_escape_passes_through_with_diagnostic() {
    let (mut t, mut defs, sink) = stream("\"a\\qb\"");
    assert_eq!(t.fetch(&mut defs), Ok(true));
    let Token::TextLiteral(id) = t.token() else {
        panic!("expected text literal");
    };
    assert_eq!(defs.text_literals.lookup(id), "aqb");
    assert!(sink.captured().contains("Unknown escape character"));
}

#[test]
fn double_angle_opens_a_quoted_echo_line() {
    let (tokens, defs) = tokens_of("x >> hello", false);
    assert_eq!(tokens.len(), 2);
    assert!(matches!(tokens[0], Token::Identifier(_)));
    let Token::QuoteLiteral(id) = tokens[1] else {
        panic!("expected quote literal, got {:?}", tokens[1]);
    };
    assert_eq!(defs.text_literals.lookup(id), "hello");
}

#[test]
fn quoted_echo_leaves_the_newline_for_the_next_fetch() {
    let (tokens, defs) = tokens_of(">> look around\nend", true);
    let Token::QuoteLiteral(id) = tokens[0] else {
        panic!("expected quote literal");
    };
    assert_eq!(defs.text_literals.lookup(id), "look around");
    assert_eq!(tokens[1], Token::Newline);
    assert_eq!(tokens[2], Token::Reserved(Reserved::End));
}

#[test]
fn comparison_is_a_short_operator_not_an_echo() {
    let (tokens, _) = tokens_of("1 < 2", false);
    assert_eq!(
        tokens,
        vec![
            Token::Numeric(1),
            Token::Operator(Oper::Less),
            Token::Numeric(2),
        ]
    );
}

#[test]
fn unterminated_literal_is_fatal_after_one_diagnostic() {
    let (mut t, mut defs, sink) = stream("\"abc\nrest");
    let result = t.fetch(&mut defs);
    assert!(matches!(result, Err(Halt::Fatal(_))));
    let captured = sink.captured();
    assert_eq!(captured.lines().count(), 1);
    assert!(captured.contains("Unterminated literal"));
    assert!(captured.contains("line 1"));
}

#[test]
fn unknown_operator_is_fatal() {
    let (mut t, mut defs, sink) = stream("a :: b");
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert!(matches!(t.fetch(&mut defs), Err(Halt::Fatal(_))));
    assert!(sink.captured().contains("Unknown operator: ::"));
}

#[test]
fn assignment_and_compound_assignment_resolve() {
    let (tokens, _) = tokens_of("x := 1; x +:= 2", false);
    assert!(tokens.contains(&Token::Operator(Oper::Assign)));
    assert!(tokens.contains(&Token::Operator(Oper::AddAssign)));
}

#[test]
fn bare_colon_reads_as_punctuation() {
    let (tokens, _) = tokens_of("a : b", false);
    assert_eq!(tokens[1], Token::Punctuation(':'));
}

#[test]
fn send_arrow_is_one_operator() {
    let (tokens, _) = tokens_of("m -> o", false);
    assert_eq!(tokens[1], Token::Operator(Oper::Send));
}

#[test]
fn message_literal_interns_into_vocabulary() {
    let (tokens, defs) = tokens_of("'open'", false);
    let Token::Message(word) = tokens[0] else {
        panic!("expected message token");
    };
    assert_eq!(defs.vocabulary.lookup(word), "open");
}

#[test]
fn comments_are_discarded_through_end_of_line() {
    let (tokens, defs) = tokens_of("a # the rest is noise := \"\nb", false);
    assert_eq!(
        tokens,
        vec![
            Token::Identifier(defs.identifiers.find("a").unwrap()),
            Token::Identifier(defs.identifiers.find("b").unwrap()),
        ]
    );
}

#[test]
fn semicolon_is_whitespace_unless_newlines_are_significant() {
    let (tokens, _) = tokens_of("a ; b", false);
    assert_eq!(tokens.len(), 2);

    let (tokens, _) = tokens_of("a ; b", true);
    assert_eq!(tokens[1], Token::Newline);
}

#[test]
fn reserved_words_and_named_operators_resolve_before_identifiers() {
    let (tokens, defs) = tokens_of("type and xyzzy", false);
    assert_eq!(tokens[0], Token::Reserved(Reserved::Type));
    assert_eq!(tokens[1], Token::Operator(Oper::And));
    assert_eq!(
        tokens[2],
        Token::Identifier(defs.identifiers.find("xyzzy").unwrap())
    );
}

#[test]
fn pushback_replays_the_same_token() {
    let (mut t, mut defs, _sink) = stream("lamp table");
    assert_eq!(t.fetch(&mut defs), Ok(true));
    let first = t.token();
    t.did_not_consume();
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert_eq!(t.token(), first);
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert_ne!(t.token(), first);
}

#[test]
fn held_back_newline_is_refetched_once_significance_ends() {
    let (mut t, mut defs, _sink) = stream("a\nb");
    t.consider_newlines();
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert_eq!(t.token(), Token::Newline);
    t.did_not_consume();
    t.restore_newlines();
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert_eq!(
        t.token(),
        Token::Identifier(defs.identifiers.find("b").unwrap())
    );
}

#[test]
fn identifier_at_end_of_input_is_still_produced() {
    let (tokens, defs) = tokens_of("abc", false);
    assert_eq!(
        tokens,
        vec![Token::Identifier(defs.identifiers.find("abc").unwrap())]
    );
}

#[test]
fn oversized_numeric_literal_clamps_with_a_diagnostic() {
    let (mut t, mut defs, sink) = stream("99999999999999999999");
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert_eq!(t.token(), Token::Numeric(i64::MAX));
    assert!(sink.captured().contains("out of range"));
}

#[test]
fn interning_is_shared_across_token_kinds() {
    let (tokens, defs) = tokens_of("lamp lamp", false);
    let (Token::Identifier(a), Token::Identifier(b)) = (tokens[0], tokens[1]) else {
        panic!("expected identifiers");
    };
    assert_eq!(a, b);
    assert_eq!(defs.identifiers.len(), 1);
}

#[test]
fn insist_on_reports_and_suppresses_after_mismatch() {
    let (mut t, mut defs, sink) = stream("( 5");
    assert_eq!(t.fetch(&mut defs), Ok(true));
    assert_eq!(
        t.insist_on(&mut defs, Token::Punctuation(':')),
        Ok(false)
    );
    assert!(sink.captured().contains("Expected ':'"));
    // Reporting is now suppressed.
    t.error_message("should not appear");
    assert!(!sink.captured().contains("should not appear"));
}

#[test]
fn empty_input_reports_end_of_stream() {
    let (mut t, mut defs, _sink) = stream("");
    assert_eq!(t.fetch(&mut defs), Ok(false));
}

#[test]
fn fetch_token_ids_are_usable_for_lookup() {
    // Interned payload types are distinct per registry.
    let (tokens, defs) = tokens_of("door \"oak\" 'push'", false);
    let ids: (Ident, TextId, Word) = match tokens[..] {
        [Token::Identifier(a), Token::TextLiteral(b), Token::Message(c)] => (a, b, c),
        ref other => panic!("unexpected tokens {other:?}"),
    };
    assert_eq!(defs.identifiers.lookup(ids.0), "door");
    assert_eq!(defs.text_literals.lookup(ids.1), "oak");
    assert_eq!(defs.vocabulary.lookup(ids.2), "push");
}
