//! Unit tests for the expression lexer.

use dim_expr::lexer::Lexer;
use dim_expr::token::{Token, TokenKind};

fn tokenize(input: &str) -> Vec<Token> {
    Lexer::tokenize(input)
}

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).iter().map(|t| t.kind).collect()
}

#[test]
fn numbers() {
    let tokens = tokenize("42");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].literal, Some(42.0));

    let tokens = tokenize("3.14");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].literal, Some(3.14));

    // A dot with no digits behind it is not part of the number.
    let tokens = tokenize("1.");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "1");
    assert_eq!(tokens[1].kind, TokenKind::Dot);
}

#[test]
fn identifiers_and_keywords() {
    let tokens = tokenize("speed _x kg2");
    assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Identifier));

    assert_eq!(kinds("as")[0], TokenKind::As);
    assert_eq!(kinds("and")[0], TokenKind::And);
    assert_eq!(kinds("or")[0], TokenKind::Or);
    assert_eq!(kinds("list")[0], TokenKind::List);
    assert_eq!(kinds("show")[0], TokenKind::Show);
    assert_eq!(kinds("clear")[0], TokenKind::Clear);
    assert_eq!(kinds("all")[0], TokenKind::All);

    // Keyword prefixes stay identifiers.
    assert_eq!(kinds("asteroid")[0], TokenKind::Identifier);
}

#[test]
fn superscripts_stay_inside_identifiers() {
    let tokens = tokenize("m\u{b2}");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].lexeme, "m\u{b2}");

    let tokens = tokenize("s\u{b3} m\u{2075}");
    assert_eq!(tokens[0].lexeme, "s\u{b3}");
    assert_eq!(tokens[1].lexeme, "m\u{2075}");
}

#[test]
fn multiplication_glyphs_lex_as_star() {
    for glyph in ["\u{b7}", "\u{22c5}", "\u{d7}"] {
        let tokens = tokenize(&format!("2 {glyph} 3"));
        assert_eq!(tokens[1].kind, TokenKind::Star, "glyph {glyph:?}");
    }
}

#[test]
fn operators() {
    assert_eq!(
        kinds("+ - * / ^ ( ) , . : ! != = == > >= < <="),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Caret,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Colon,
            TokenKind::Bang,
            TokenKind::BangEqual,
            TokenKind::Equal,
            TokenKind::EqualEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    let tokens = tokenize("1 // the rest is ignored * /\n2");
    assert_eq!(tokens[0].literal, Some(1.0));
    assert_eq!(tokens[1].literal, Some(2.0));
    assert_eq!(tokens[2].kind, TokenKind::Eof);
}

#[test]
fn division_is_not_a_comment() {
    assert_eq!(
        kinds("6 / 2"),
        vec![TokenKind::Number, TokenKind::Slash, TokenKind::Number, TokenKind::Eof]
    );
}

#[test]
fn malformed_character_reports_and_continues() {
    let tokens = tokenize("1 @ 2");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert!(tokens[1].lexeme.contains('@'));
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
}

#[test]
fn line_tracking() {
    let tokens = tokenize("1\n2\n#");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[2].kind, TokenKind::Error);
    assert_eq!(tokens[2].line, 3);
}

#[test]
fn empty_input_is_just_eof() {
    let tokens = tokenize("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);

    let tokens = tokenize("   \t  ");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}
