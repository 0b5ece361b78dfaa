//! Cross-registry unit lookup.
//!
//! The engine consults sources in a fixed order that is part of its
//! contract: the constants table, then SI, Imperial, CGS, Industrial and
//! any user-supplied registries. Lookup runs in two passes, exact matches
//! everywhere before any prefix expansion anywhere, so a prefix match in
//! SI (`m` + `i`) can never shadow an exact symbol in Imperial (`mi`).

use crate::constants::ConstantsTable;
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use dim_units::{catalog, Dimension, Registry, Unit};

/// A unit expression reduced to numbers: dimension, multiplicative factor,
/// and the underlying unit when the expression was one bare symbol at
/// exponent 1 (the only shape affine conversion applies to).
#[derive(Debug, Clone)]
pub struct ResolvedUnit {
    pub dim: Dimension,
    pub factor: f64,
    pub unit: Option<Unit>,
}

/// Resolves unit symbols against the constants table, the built-in
/// catalogues and any user extras.
pub struct Resolver<'a> {
    constants: &'a ConstantsTable,
    extras: &'a [Registry],
}

impl<'a> Resolver<'a> {
    pub fn new(constants: &'a ConstantsTable, extras: &'a [Registry]) -> Self {
        Self { constants, extras }
    }

    fn registries(&self) -> impl Iterator<Item = &Registry> {
        catalog::builtin().iter().chain(self.extras.iter())
    }

    /// Resolve one symbol: constants, then exact in every registry, then
    /// prefix expansion in the same registry order.
    pub fn resolve(&self, sym: &str) -> Result<Unit> {
        if let Some(unit) = self.constants.get(sym) {
            return Ok(unit.clone());
        }
        for registry in self.registries() {
            if let Some(unit) = registry.find_exact(sym) {
                return Ok(unit.clone());
            }
        }
        for registry in self.registries() {
            if let Some(unit) = registry.find(sym) {
                return Ok(unit);
            }
        }
        Err(Error::UndefinedVariable(sym.to_string()))
    }

    /// Resolve a display-unit string such as `m/s^2`, `N*s`, `kg/d` or
    /// `1/A` back into dimension and factor.
    ///
    /// The grammar is the unit sub-grammar plus a leading integer atom for
    /// the `1/...` spellings the normalizer emits.
    pub fn resolve_unit_str(&self, src: &str) -> Result<ResolvedUnit> {
        let tokens = Lexer::tokenize(src);
        let mut parser = UnitStrParser {
            resolver: self,
            tokens,
            position: 0,
        };
        parser.parse()
    }
}

struct UnitStrParser<'a, 'b> {
    resolver: &'a Resolver<'b>,
    tokens: Vec<Token>,
    position: usize,
}

impl UnitStrParser<'_, '_> {
    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn malformed(&self) -> Error {
        Error::InvalidOperand(format!("malformed unit string at '{}'", self.current().lexeme))
    }

    fn parse(&mut self) -> Result<ResolvedUnit> {
        let mut resolved = self.parse_atom()?;
        let single_term = resolved.unit.is_some();

        let mut compound = false;
        loop {
            let divide = match self.current().kind {
                TokenKind::Star => false,
                TokenKind::Slash => true,
                TokenKind::Eof => break,
                _ => return Err(self.malformed()),
            };
            self.advance();
            compound = true;
            let rhs = self.parse_atom()?;
            if divide {
                resolved.dim = resolved.dim - rhs.dim;
                resolved.factor /= rhs.factor;
            } else {
                resolved.dim = resolved.dim + rhs.dim;
                resolved.factor *= rhs.factor;
            }
        }

        if compound || !single_term {
            resolved.unit = None;
        }
        Ok(resolved)
    }

    fn parse_atom(&mut self) -> Result<ResolvedUnit> {
        match self.current().kind {
            TokenKind::Number => {
                let token = self.advance();
                let value = token.literal.unwrap_or(f64::NAN);
                Ok(ResolvedUnit {
                    dim: Dimension::ZERO,
                    factor: value,
                    unit: None,
                })
            }
            TokenKind::Identifier => {
                let token = self.advance();
                let (name, exp) = split_symbol_exponent(&token.lexeme);
                let mut exp = exp;
                if self.current().kind == TokenKind::Caret {
                    self.advance();
                    let number = self.advance();
                    if number.kind != TokenKind::Number {
                        return Err(self.malformed());
                    }
                    exp = number.literal.unwrap_or(f64::NAN) as i32;
                }
                let unit = self.resolver.resolve(&name)?;
                Ok(ResolvedUnit {
                    dim: unit.dim.pow(exp),
                    factor: unit.factor().powi(exp),
                    unit: (exp == 1).then_some(unit),
                })
            }
            _ => Err(self.malformed()),
        }
    }
}

/// Split a trailing superscript exponent off a symbol; `m²` → `("m", 2)`.
fn split_symbol_exponent(lexeme: &str) -> (String, i32) {
    let Some(start) = lexeme.find(crate::lexer::is_superscript) else {
        return (lexeme.to_string(), 1);
    };
    let (name, suffix) = lexeme.split_at(start);
    let mut exp: i32 = 0;
    for c in suffix.chars() {
        let digit = match c {
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
            _ => continue,
        };
        exp = exp * 10 + digit;
    }
    (name.to_string(), exp)
}
