//! Tree-walking evaluator.
//!
//! Quantities always hold canonical magnitudes; display units are carried
//! as strings next to them. Affine conversion (Celsius, Fahrenheit) only
//! applies where a bare unit symbol appears at exponent 1; everywhere else
//! units act multiplicatively.

use crate::ast::{BinaryOp, Expr, UnaryOp, UnitOp};
use crate::constants::ConstantsTable;
use crate::error::{Error, Result};
use crate::resolver::Resolver;
use crate::value::{FormatMode, Quantity, Value};
use dim_units::{catalog, normalize, Dimension, Registry};

/// Evaluates expression trees against the session's constants table.
pub struct Evaluator<'a> {
    constants: &'a mut ConstantsTable,
    extras: &'a [Registry],
}

impl<'a> Evaluator<'a> {
    pub fn new(constants: &'a mut ConstantsTable, extras: &'a [Registry]) -> Self {
        Self { constants, extras }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.constants, self.extras)
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Grouping(inner) => self.eval(inner),
            Expr::Unary { op, expr } => self.eval_unary(*op, expr),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::UnitTerm { .. } | Expr::CompoundUnit { .. } => {
                self.eval_unit_expr(expr).map(Value::Quantity)
            }
            Expr::UnitApplied { value, unit } => self.eval_unit_applied(value, unit),
            Expr::Display { expr, unit, mode } => self.eval_display(expr, unit, *mode),
            Expr::Assignment { name, value } => self.eval_assignment(name, value),
        }
    }

    /// Evaluate a unit sub-expression to a quantity whose value is its
    /// multiplicative canonical factor. The affine offset never enters
    /// here; it is only applied by `eval_unit_applied` for bare symbols.
    fn eval_unit_expr(&self, expr: &Expr) -> Result<Quantity> {
        match expr {
            Expr::UnitTerm { name, exp } => {
                let unit = self.resolver().resolve(name)?;
                Ok(Quantity::new(
                    unit.factor().powi(*exp),
                    unit.dim.pow(*exp),
                    expr.unit_symbol(),
                ))
            }
            Expr::CompoundUnit { op, left, right } => {
                let lhs = self.eval_unit_expr(left)?;
                let rhs = self.eval_unit_expr(right)?;
                let (value, dim) = match op {
                    UnitOp::Mul => (lhs.value * rhs.value, lhs.dim + rhs.dim),
                    UnitOp::Div => (lhs.value / rhs.value, lhs.dim - rhs.dim),
                };
                Ok(Quantity::new(value, dim, expr.unit_symbol()))
            }
            _ => Err(Error::UnsupportedOperator(
                "non-unit node in unit expression".to_string(),
            )),
        }
    }

    /// Number × unit expression. A bare symbol at exponent 1 converts
    /// affinely, so `10 C` lands at `283.15` kelvin; anything else is a
    /// plain multiplication by the canonical factor.
    fn eval_unit_applied(&mut self, value: &Expr, unit: &Expr) -> Result<Value> {
        let n = match self.eval(value)? {
            Value::Number(n) => n,
            _ => {
                return Err(Error::InvalidOperand(
                    "unit application requires a number".to_string(),
                ))
            }
        };

        if let Some(name) = unit.simple_unit_name() {
            let resolved = self.resolver().resolve(name)?;
            return Ok(Value::Quantity(Quantity::new(
                resolved.to_canonical(n),
                resolved.dim,
                unit.unit_symbol(),
            )));
        }

        let factor = self.eval_unit_expr(unit)?;
        Ok(Value::Quantity(Quantity::new(
            n * factor.value,
            factor.dim,
            unit.unit_symbol(),
        )))
    }

    fn eval_unary(&mut self, op: UnaryOp, expr: &Expr) -> Result<Value> {
        let operand = self.eval(expr)?;
        match op {
            UnaryOp::Not => Ok(Value::Boolean(!operand.is_truthy())),
            UnaryOp::Negate => match operand {
                Value::Number(n) => Ok(Value::Number(-n)),
                Value::Quantity(mut q) => {
                    q.value = -q.value;
                    Ok(Value::Quantity(q))
                }
                _ => Err(Error::InvalidOperand(
                    "operand of '-' must be a number or quantity".to_string(),
                )),
            },
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value> {
        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;

        match op {
            BinaryOp::Add | BinaryOp::Sub => self.eval_additive(op, lhs, rhs),
            BinaryOp::Mul | BinaryOp::Div => self.eval_multiplicative(op, lhs, rhs),
            BinaryOp::Pow => self.eval_pow(lhs, rhs),
            BinaryOp::Greater | BinaryOp::GreaterEqual | BinaryOp::Less | BinaryOp::LessEqual => {
                self.eval_comparison(op, lhs, rhs)
            }
            BinaryOp::Equal => Ok(Value::Boolean(values_equal(&lhs, &rhs))),
            BinaryOp::NotEqual => Ok(Value::Boolean(!values_equal(&lhs, &rhs))),
        }
    }

    /// `+`/`-` requires matching kinds; quantities must share a dimension
    /// and keep the left operand's display unit. Subtracting two absolute
    /// temperatures yields an increment.
    fn eval_additive(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
                BinaryOp::Add => a + b,
                _ => a - b,
            })),
            (Value::Quantity(a), Value::Quantity(b)) => {
                if a.dim != b.dim {
                    return Err(Error::InvalidOperands(format!(
                        "dimension mismatch: {} vs {}",
                        a.dim, b.dim
                    )));
                }
                let value = match op {
                    BinaryOp::Add => a.value + b.value,
                    _ => a.value - b.value,
                };
                let is_delta = match op {
                    BinaryOp::Add => a.is_delta && b.is_delta,
                    _ => {
                        (a.is_delta && b.is_delta)
                            || (a.dim == Dimension::TEMPERATURE && !a.is_delta && !b.is_delta)
                    }
                };
                let mut out = Quantity::new(value, a.dim, a.unit);
                out.is_delta = is_delta;
                Ok(Value::Quantity(out))
            }
            _ => Err(Error::InvalidOperands(
                "'+' and '-' need two numbers or two quantities".to_string(),
            )),
        }
    }

    /// `*`/`/`: quantity-quantity composes dimensions and renames the
    /// result through the normalizer; scalar-quantity scales in place and
    /// keeps the display unit.
    fn eval_multiplicative(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
        let divide = op == BinaryOp::Div;
        match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => {
                if divide {
                    if b == 0.0 {
                        return Err(Error::DivisionByZero);
                    }
                    Ok(Value::Number(a / b))
                } else {
                    Ok(Value::Number(a * b))
                }
            }
            (Value::Quantity(a), Value::Quantity(b)) => {
                if divide && b.value == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                let (value, dim) = if divide {
                    (a.value / b.value, a.dim - b.dim)
                } else {
                    (a.value * b.value, a.dim + b.dim)
                };
                let sep = if divide { '/' } else { '*' };
                let compound = format!("{}{}{}", a.unit, sep, b.unit);
                let unit = normalize(dim, catalog::si_registry(), &compound);
                Ok(Value::Quantity(Quantity::new(value, dim, unit)))
            }
            (Value::Number(a), Value::Quantity(mut q)) if !divide => {
                q.value *= a;
                Ok(Value::Quantity(q))
            }
            (Value::Quantity(mut q), Value::Number(b)) => {
                if divide {
                    if b == 0.0 {
                        return Err(Error::DivisionByZero);
                    }
                    q.value /= b;
                } else {
                    q.value *= b;
                }
                Ok(Value::Quantity(q))
            }
            _ => Err(Error::InvalidOperands(
                "'*' and '/' need numbers or quantities".to_string(),
            )),
        }
    }

    /// `^` with a numeric exponent. Integer exponents scale the dimension
    /// exactly; fractional ones must still land on integer exponents.
    fn eval_pow(&self, lhs: Value, rhs: Value) -> Result<Value> {
        let exp = match rhs {
            Value::Number(n) => n,
            _ => {
                return Err(Error::InvalidOperand(
                    "exponent must be a number".to_string(),
                ))
            }
        };

        match lhs {
            Value::Number(base) => Ok(Value::Number(base.powf(exp))),
            Value::Quantity(q) => {
                let rounded = exp.round();
                let dim = if (exp - rounded).abs() < 1e-9 {
                    q.dim.pow(rounded as i32)
                } else {
                    q.dim.powf(exp)?
                };
                let value = q.value.powf(exp);
                let unit = normalize(dim, catalog::si_registry(), "");
                Ok(Value::Quantity(Quantity::new(value, dim, unit)))
            }
            _ => Err(Error::InvalidOperand(
                "base of '^' must be a number or quantity".to_string(),
            )),
        }
    }

    fn eval_comparison(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
        let ordering = match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => (a, b),
            (Value::Quantity(a), Value::Quantity(b)) => {
                if a.dim != b.dim {
                    return Err(Error::InvalidOperands(format!(
                        "dimension mismatch: {} vs {}",
                        a.dim, b.dim
                    )));
                }
                (a.value, b.value)
            }
            _ => {
                return Err(Error::InvalidOperands(
                    "comparison needs two numbers or two quantities".to_string(),
                ))
            }
        };

        let (a, b) = ordering;
        let result = match op {
            BinaryOp::Greater => a > b,
            BinaryOp::GreaterEqual => a >= b,
            BinaryOp::Less => a < b,
            BinaryOp::LessEqual => a <= b,
            other => {
                return Err(Error::UnsupportedOperator(format!("{other:?}")));
            }
        };
        Ok(Value::Boolean(result))
    }

    /// `as` clause: check the target dimension, keep the canonical value,
    /// swap in the user's target symbol verbatim and select the mode
    /// (3-decimal auto when the clause names none).
    fn eval_display(&mut self, expr: &Expr, unit: &Expr, mode: Option<FormatMode>) -> Result<Value> {
        let value = self.eval(expr)?;
        let Value::Quantity(q) = value else {
            return Err(Error::InvalidOperand(
                "'as' requires a quantity".to_string(),
            ));
        };

        let target_dim = if let Some(name) = unit.simple_unit_name() {
            self.resolver().resolve(name)?.dim
        } else {
            self.eval_unit_expr(unit)?.dim
        };

        if q.dim != target_dim {
            return Err(Error::InvalidOperands(format!(
                "dimension mismatch: {} vs {}",
                q.dim, target_dim
            )));
        }

        let mut out = Quantity::new(q.value, q.dim, unit.unit_symbol());
        out.mode = mode.unwrap_or(FormatMode::Auto);
        out.is_delta = q.is_delta;
        Ok(Value::Quantity(out))
    }

    /// `name = ( expr )`: store the quantity as a synthetic unit and return
    /// it so a chained expression can observe the definition.
    fn eval_assignment(&mut self, name: &str, value: &Expr) -> Result<Value> {
        let evaluated = self.eval(value)?;
        let Value::Quantity(q) = evaluated else {
            return Err(Error::InvalidOperand(
                "constant definition requires a quantity".to_string(),
            ));
        };
        self.constants.define(name, &q);
        Ok(Value::Quantity(q))
    }
}

/// Per-variant equality: IEEE on numbers, dimension plus canonical value on
/// quantities, mismatched kinds compare unequal.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Nil, Value::Nil) => true,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Quantity(a), Value::Quantity(b)) => a.dim == b.dim && a.value == b.value,
        _ => false,
    }
}
