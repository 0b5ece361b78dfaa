//! The driver.
//!
//! Binds lexer, parser, evaluator and formatter behind `eval`, `define`,
//! `clear` and `clear_all`, and recognizes the standalone commands `list`,
//! `show NAME`, `clear NAME` and `clear all` at the token level before any
//! expression parsing happens.

use crate::constants::ConstantsTable;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::format::format_value;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::token::{Token, TokenKind};
use crate::value::Value;
use dim_units::{catalog, normalize, Registry, Unit};

enum Command {
    List,
    Show(String),
    Clear(String),
    ClearAll,
}

/// One calculator session: the constants table plus optional extra
/// registries consulted after the built-in catalogues.
///
/// The engine holds no locks; callers needing concurrent evaluation give
/// each thread its own instance.
#[derive(Debug, Default)]
pub struct Engine {
    constants: ConstantsTable,
    extras: Vec<Registry>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user registry; it is consulted after the built-ins.
    pub fn push_registry(&mut self, registry: Registry) {
        self.extras.push(registry);
    }

    /// Evaluate one input line and render the result.
    ///
    /// A line may hold several expressions (typically an assignment
    /// followed by a trailing expression); only the last value is
    /// rendered.
    pub fn eval(&mut self, src: &str) -> Result<String> {
        let tokens = Lexer::tokenize(src);

        if let Some(bad) = tokens.iter().find(|t| t.kind == TokenKind::Error) {
            return Err(Error::Lex {
                line: bad.line,
                message: bad.lexeme.clone(),
            });
        }

        if let Some(command) = Self::match_command(&tokens) {
            return self.run_command(command);
        }

        let exprs = Parser::new(tokens).parse_program()?;
        let mut last = Value::Nil;
        {
            let mut evaluator = Evaluator::new(&mut self.constants, &self.extras);
            for expr in &exprs {
                last = evaluator.eval(expr)?;
            }
        }

        let resolver = Resolver::new(&self.constants, &self.extras);
        Ok(format_value(&last, &resolver))
    }

    /// Define a constant from an expression source. Failures leave the
    /// constants table unchanged.
    pub fn define(&mut self, name: &str, expr: &str) -> Result<()> {
        self.eval(&format!("{name} = ( {expr} )"))?;
        Ok(())
    }

    /// Remove one constant.
    pub fn clear(&mut self, name: &str) {
        self.constants.clear(name);
    }

    /// Remove every constant.
    pub fn clear_all(&mut self) {
        self.constants.clear_all();
    }

    fn match_command(tokens: &[Token]) -> Option<Command> {
        let kind_at = |i: usize| tokens.get(i).map(|t| t.kind);
        match kind_at(0)? {
            TokenKind::List if kind_at(1) == Some(TokenKind::Eof) => Some(Command::List),
            TokenKind::Show
                if kind_at(1) == Some(TokenKind::Identifier)
                    && kind_at(2) == Some(TokenKind::Eof) =>
            {
                Some(Command::Show(tokens[1].lexeme.clone()))
            }
            TokenKind::Clear if kind_at(1) == Some(TokenKind::All) && kind_at(2) == Some(TokenKind::Eof) => {
                Some(Command::ClearAll)
            }
            TokenKind::Clear
                if kind_at(1) == Some(TokenKind::Identifier)
                    && kind_at(2) == Some(TokenKind::Eof) =>
            {
                Some(Command::Clear(tokens[1].lexeme.clone()))
            }
            _ => None,
        }
    }

    fn run_command(&mut self, command: Command) -> Result<String> {
        match command {
            Command::List => {
                let lines: Vec<String> =
                    self.constants.iter().map(Self::describe_constant).collect();
                Ok(lines.join("\n"))
            }
            Command::Show(name) => match self.constants.get(&name) {
                Some(unit) => Ok(Self::describe_constant(unit)),
                None => Err(Error::UndefinedVariable(name)),
            },
            Command::Clear(name) => {
                self.constants.clear(&name);
                Ok("ok".to_string())
            }
            Command::ClearAll => {
                self.constants.clear_all();
                Ok("ok".to_string())
            }
        }
    }

    fn describe_constant(unit: &Unit) -> String {
        let symbol = normalize(unit.dim, catalog::si_registry(), "");
        format!(
            "{name}: dim {dim}, 1 {name} = {scale} {symbol}",
            name = unit.symbol,
            dim = unit.dim,
            scale = unit.scale,
        )
        .trim_end()
        .to_string()
    }
}
