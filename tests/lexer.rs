mod support;

use basalt::{tokenize, Token};

#[test]
fn identifier_round_trip() {
    let toks = tokenize("thing_1").unwrap();
    assert_eq!(toks, vec![Token::Identifier("thing_1".into())]);
}

#[test]
fn keyword_is_not_an_identifier() {
    let toks = tokenize("while").unwrap();
    assert_eq!(toks, vec![Token::Keyword("while".into())]);
}

#[test]
fn crlf_is_normalized_to_a_single_newline() {
    let toks = tokenize("a\r\nb").unwrap();
    let newlines = toks.iter().filter(|t| **t == Token::Newline).count();
    assert_eq!(newlines, 1);
}

#[test]
fn line_counting_over_a_declarative_program() {
    // spec.md §8: for n line terminators, the line counter advances by
    // exactly n — the token stream carries exactly one NEWLINE per
    // terminator, which is what the interpreter's cursor counts.
    let src = "let a = 1\nlet b = 2\nlet c = 3\n";
    let n = src.matches('\n').count();
    let (flow, _host) = support::run(src);
    flow.unwrap();
    let toks = tokenize(src).unwrap();
    assert_eq!(toks.iter().filter(|t| **t == Token::Newline).count(), n);
}
