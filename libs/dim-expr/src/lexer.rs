//! Lexer for dim expressions.
//!
//! Single-byte ASCII plus two UTF-8 classes: superscript digits, which may
//! appear inside identifiers (`m²` is one token), and the multiplication
//! glyphs `·`, `⋅` and `×`, which lex as `*`. A malformed character
//! produces a line-tagged error token and scanning continues, so every
//! input yields a stream ending in `Eof`.

use crate::token::{Token, TokenKind};

/// Superscript digits accepted inside identifiers.
pub(crate) fn is_superscript(c: char) -> bool {
    matches!(c, '\u{b9}' | '\u{b2}' | '\u{b3}' | '\u{2070}' | '\u{2074}'..='\u{2079}')
}

/// Multiplication signs: U+00B7, U+22C5, U+00D7.
fn is_multiplication_sign(c: char) -> bool {
    matches!(c, '\u{b7}' | '\u{22c5}' | '\u{d7}')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || is_superscript(c)
}

/// The dim lexer.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: usize,
    current_char: Option<char>,
}

impl Lexer {
    /// Create a new lexer for the given input.
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            chars,
            position: 0,
            line: 1,
            current_char,
        }
    }

    /// Tokenize the whole input, including any error tokens.
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Advance to the next character.
    fn advance(&mut self) {
        if self.current_char == Some('\n') {
            self.line += 1;
        }
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Peek at the next character without advancing.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a `//` line comment.
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current_char {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Read a number: `[0-9]+('.'[0-9]+)?`.
    ///
    /// A dot with no digit behind it is left for the next token.
    fn read_number(&mut self) -> (String, f64) {
        let start = self.position;

        while let Some(c) = self.current_char {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char == Some('.') && self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            self.advance(); // Skip '.'
            while let Some(c) = self.current_char {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let lexeme: String = self.chars[start..self.position].iter().collect();
        // The character class above is a strict subset of f64 syntax.
        let value = lexeme.parse::<f64>().unwrap_or(f64::NAN);
        (lexeme, value)
    }

    /// Read an identifier, allowing embedded superscript digits.
    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while let Some(c) = self.current_char {
            if is_identifier_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.chars[start..self.position].iter().collect()
    }

    fn keyword(lexeme: &str) -> Option<TokenKind> {
        match lexeme {
            "as" => Some(TokenKind::As),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "list" => Some(TokenKind::List),
            "show" => Some(TokenKind::Show),
            "clear" => Some(TokenKind::Clear),
            "all" => Some(TokenKind::All),
            _ => None,
        }
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if self.current_char == Some('/') && self.peek() == Some('/') {
                self.skip_line_comment();
            } else {
                break;
            }
        }

        let line = self.line;

        let Some(c) = self.current_char else {
            return Token::eof(line);
        };

        if c.is_ascii_digit() {
            let (lexeme, value) = self.read_number();
            return Token::number(lexeme, value, line);
        }

        if is_identifier_start(c) {
            let lexeme = self.read_identifier();
            return match Self::keyword(&lexeme) {
                Some(kind) => Token::new(kind, lexeme, line),
                None => Token::new(TokenKind::Identifier, lexeme, line),
            };
        }

        if is_multiplication_sign(c) {
            self.advance();
            return Token::new(TokenKind::Star, c.to_string(), line);
        }

        // One- and two-character operators.
        match c {
            '+' => {
                self.advance();
                Token::new(TokenKind::Plus, "+", line)
            }
            '-' => {
                self.advance();
                Token::new(TokenKind::Minus, "-", line)
            }
            '*' => {
                self.advance();
                Token::new(TokenKind::Star, "*", line)
            }
            '/' => {
                self.advance();
                Token::new(TokenKind::Slash, "/", line)
            }
            '^' => {
                self.advance();
                Token::new(TokenKind::Caret, "^", line)
            }
            '(' => {
                self.advance();
                Token::new(TokenKind::LParen, "(", line)
            }
            ')' => {
                self.advance();
                Token::new(TokenKind::RParen, ")", line)
            }
            ',' => {
                self.advance();
                Token::new(TokenKind::Comma, ",", line)
            }
            '.' => {
                self.advance();
                Token::new(TokenKind::Dot, ".", line)
            }
            ':' => {
                self.advance();
                Token::new(TokenKind::Colon, ":", line)
            }
            '!' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::new(TokenKind::BangEqual, "!=", line)
                } else {
                    Token::new(TokenKind::Bang, "!", line)
                }
            }
            '=' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::new(TokenKind::EqualEqual, "==", line)
                } else {
                    Token::new(TokenKind::Equal, "=", line)
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::new(TokenKind::GreaterEqual, ">=", line)
                } else {
                    Token::new(TokenKind::Greater, ">", line)
                }
            }
            '<' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::new(TokenKind::LessEqual, "<=", line)
                } else {
                    Token::new(TokenKind::Less, "<", line)
                }
            }
            other => {
                self.advance();
                Token::error(format!("Unexpected character '{other}'"), line)
            }
        }
    }
}
