//! Recursive descent parser for dim expressions.
//!
//! Precedence, lowest to highest: conversion (`as`), comparison, term
//! (`+ -`), factor (`* /`), power (`^`, right-associative), unary
//! (`- !`), primary.
//!
//! Two context-sensitive rules make unit syntax read naturally:
//!
//! * after a number, an identifier starts a unit expression
//!   (`2 m` is one quantity);
//! * inside a unit expression, `*` and `/` are consumed only when the token
//!   after them is an identifier, and `^` only when the token after it is a
//!   number. One token of lookahead is what separates `2 m * 3 m` (two
//!   quantities multiplied) from `2 m/s` (one speed).

use crate::ast::{BinaryOp, Expr, UnaryOp, UnitOp};
use crate::error::{Error, Result};
use crate::lexer::is_superscript;
use crate::token::{Token, TokenKind};
use crate::value::FormatMode;

const MAX_RECURSION_DEPTH: usize = 200;

/// Parser over a buffered token stream.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn check_at(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek(offset).map(|t| t.kind == kind).unwrap_or(false)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(message))
        }
    }

    fn error_at_current(&self, message: &str) -> Error {
        let token = self.current();
        let lexeme = if token.kind == TokenKind::Eof {
            "end".to_string()
        } else {
            token.lexeme.clone()
        };
        Error::Parse {
            line: token.line,
            lexeme,
            message: message.to_string(),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(self.error_at_current("Expression too deeply nested"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parse a whole input line: one or more expressions up to end of
    /// input. An assignment followed by a trailing expression is the
    /// common two-element case.
    pub fn parse_program(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = Vec::new();
        while !self.check(TokenKind::Eof) {
            exprs.push(self.parse_conversion()?);
        }
        Ok(exprs)
    }

    /// conversion := expression ("as" unitExpr (":" mode)?)?
    fn parse_conversion(&mut self) -> Result<Expr> {
        self.enter()?;
        let expr = self.parse_comparison()?;
        self.leave();

        if !self.matches(TokenKind::As) {
            return Ok(expr);
        }

        let unit = self.parse_unit_expr()?;
        let mode = if self.matches(TokenKind::Colon) {
            let token = self.expect(TokenKind::Identifier, "Expect format mode after ':'")?;
            Some(FormatMode::from_name(&token.lexeme))
        } else {
            None
        };

        Ok(Expr::Display {
            expr: Box::new(expr),
            unit: Box::new(unit),
            mode,
        })
    }

    /// comparison := term ((">" | ">=" | "<" | "<=" | "=" | "==" | "!=") term)*
    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                TokenKind::Equal | TokenKind::EqualEqual => BinaryOp::Equal,
                TokenKind::BangEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// term := factor (("+" | "-") factor)*
    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// factor := power (("*" | "/") power)*
    fn parse_factor(&mut self) -> Result<Expr> {
        let mut left = self.parse_power()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// power := unary ("^" power)?   (right-associative)
    fn parse_power(&mut self) -> Result<Expr> {
        let left = self.parse_unary()?;

        if self.matches(TokenKind::Caret) {
            let right = self.parse_power()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    /// unary := ("-" | "!") unary | primary
    ///
    /// `-5 m/s` reassociates the sign into the number so the whole thing is
    /// one negative quantity, not `-(5 m) / s`.
    fn parse_unary(&mut self) -> Result<Expr> {
        self.enter()?;
        let expr = if self.check(TokenKind::Minus) {
            if self.check_at(1, TokenKind::Number) && self.check_at(2, TokenKind::Identifier) {
                self.advance(); // Skip '-'
                let number = self.advance();
                let value = number.literal.unwrap_or(f64::NAN);
                let unit = self.parse_unit_expr()?;
                Ok(Expr::UnitApplied {
                    value: Box::new(Expr::Number(-value)),
                    unit: Box::new(unit),
                })
            } else {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Negate,
                    expr: Box::new(operand),
                })
            }
        } else if self.matches(TokenKind::Bang) {
            let operand = self.parse_unary()?;
            Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(operand),
            })
        } else {
            self.parse_primary()
        };
        self.leave();
        expr
    }

    /// primary := Number unitExpr? | "(" conversion ")" | Ident "=" "(" conversion ")"
    fn parse_primary(&mut self) -> Result<Expr> {
        if self.check(TokenKind::Number) {
            let token = self.advance();
            let value = token.literal.unwrap_or(f64::NAN);
            if self.check(TokenKind::Identifier) {
                let unit = self.parse_unit_expr()?;
                return Ok(Expr::UnitApplied {
                    value: Box::new(Expr::Number(value)),
                    unit: Box::new(unit),
                });
            }
            return Ok(Expr::Number(value));
        }

        if self.matches(TokenKind::LParen) {
            let expr = self.parse_conversion()?;
            self.expect(TokenKind::RParen, "Expect ')' after expression")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        if self.check(TokenKind::Identifier) && self.check_at(1, TokenKind::Equal) {
            let name = self.advance().lexeme;
            self.advance(); // Skip '='
            self.expect(TokenKind::LParen, "Expect '(' after '='")?;
            let value = self.parse_conversion()?;
            self.expect(TokenKind::RParen, "Expect ')' after constant value")?;
            return Ok(Expr::Assignment {
                name,
                value: Box::new(Expr::Grouping(Box::new(value))),
            });
        }

        Err(self.error_at_current("Expect expression"))
    }

    /// unitExpr := unitTerm (("*" | "/") unitTerm)*
    ///
    /// `*` and `/` are consumed only when the token after them is an
    /// identifier; otherwise they belong to the enclosing arithmetic.
    fn parse_unit_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unit_term()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Star => UnitOp::Mul,
                TokenKind::Slash => UnitOp::Div,
                _ => break,
            };
            if !self.check_at(1, TokenKind::Identifier) {
                break;
            }
            self.advance();
            let right = self.parse_unit_term()?;
            expr = Expr::CompoundUnit {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// unitTerm := Ident ("^" Number)?
    ///
    /// A superscript suffix (`m²`) is an exponent too; the caret form is
    /// only considered when no superscript is present, and only when the
    /// token after `^` is a number.
    fn parse_unit_term(&mut self) -> Result<Expr> {
        let token = self.expect(TokenKind::Identifier, "Expect unit name")?;
        let (name, superscript) = self.split_superscript(&token)?;

        let mut exp = superscript.unwrap_or(1);
        if superscript.is_none()
            && self.check(TokenKind::Caret)
            && self.check_at(1, TokenKind::Number)
        {
            self.advance(); // Skip '^'
            let number = self.advance();
            exp = number.literal.unwrap_or(f64::NAN) as i32;
        }

        Ok(Expr::UnitTerm { name, exp })
    }

    /// Split `m²` into `("m", Some(2))`. Superscript digits are only valid
    /// as a contiguous suffix.
    fn split_superscript(&self, token: &Token) -> Result<(String, Option<i32>)> {
        let lexeme = &token.lexeme;
        let Some(start) = lexeme.find(is_superscript) else {
            return Ok((lexeme.clone(), None));
        };

        let (name, suffix) = lexeme.split_at(start);
        if name.is_empty() || !suffix.chars().all(is_superscript) {
            return Err(Error::Parse {
                line: token.line,
                lexeme: lexeme.clone(),
                message: "Malformed superscript exponent".to_string(),
            });
        }

        let mut exp: i32 = 0;
        for c in suffix.chars() {
            exp = exp.saturating_mul(10).saturating_add(superscript_digit(c));
        }
        Ok((name.to_string(), Some(exp)))
    }
}

fn superscript_digit(c: char) -> i32 {
    match c {
        '\u{2070}' => 0,
        '\u{b9}' => 1,
        '\u{b2}' => 2,
        '\u{b3}' => 3,
        '\u{2074}' => 4,
        '\u{2075}' => 5,
        '\u{2076}' => 6,
        '\u{2077}' => 7,
        '\u{2078}' => 8,
        '\u{2079}' => 9,
        _ => 0,
    }
}
