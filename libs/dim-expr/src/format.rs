//! Output rendering.
//!
//! Quantities store canonical magnitudes, so rendering converts back into
//! the display unit first: affinely for a bare affine symbol (unless the
//! quantity is a temperature increment), multiplicatively otherwise.

use crate::resolver::Resolver;
use crate::value::{FormatMode, Quantity, Value};
use dim_units::catalog;

/// Render an evaluated value.
pub fn format_value(value: &Value, resolver: &Resolver) -> String {
    match value {
        Value::Number(n) => render_magnitude(*n, FormatMode::None),
        Value::Boolean(b) => b.to_string(),
        Value::Nil => String::new(),
        Value::Quantity(q) => format_quantity(q, resolver),
    }
}

fn format_quantity(q: &Quantity, resolver: &Resolver) -> String {
    if q.unit.is_empty() {
        let text = render_magnitude(q.value, q.mode);
        return if q.is_delta { format!("\u{394}{text}") } else { text };
    }

    let mut display_value = q.value;
    if let Ok(resolved) = resolver.resolve_unit_str(&q.unit) {
        display_value = match &resolved.unit {
            Some(unit) if unit.is_affine() && !q.is_delta => unit.from_canonical(q.value),
            _ => q.value / resolved.factor,
        };
    }

    let (display_value, symbol) = rescale_with_prefix(display_value, q);

    let text = render_magnitude(display_value, q.mode);
    let line = format!("{text} {symbol}");
    if q.is_delta {
        format!("\u{394}{line}")
    } else {
        line
    }
}

/// In auto mode, pull the magnitude into `[1, 1000)` with the best SI
/// prefix. Only plain, unprefixed, non-affine SI symbols are rescaled;
/// anything else keeps its symbol untouched.
fn rescale_with_prefix(value: f64, q: &Quantity) -> (f64, String) {
    if q.mode != FormatMode::Auto
        || value == 0.0
        || !value.is_finite()
        || (1.0..1000.0).contains(&value.abs())
    {
        return (value, q.unit.clone());
    }

    let si = catalog::si_registry();
    let Some(base) = si.find_exact(&q.unit) else {
        return (value, q.unit.clone());
    };
    if base.is_affine() {
        return (value, q.unit.clone());
    }

    let mut prefixes: Vec<_> = si.prefixes().to_vec();
    prefixes.sort_by(|a, b| b.factor.total_cmp(&a.factor));

    for prefix in &prefixes {
        let scaled = value / prefix.factor;
        if (1.0..1000.0).contains(&scaled.abs()) {
            return (scaled, format!("{}{}", prefix.symbol, q.unit));
        }
    }

    (value, q.unit.clone())
}

fn render_magnitude(value: f64, mode: FormatMode) -> String {
    match mode {
        FormatMode::None => format!("{value}"),
        FormatMode::Auto => format!("{value:.3}"),
        FormatMode::Scientific => format!("{value:.3e}"),
        FormatMode::Engineering => {
            let (mantissa, exponent) = engineering_parts(value);
            format!("{mantissa:.3}e{exponent}")
        }
    }
}

/// Scale so the decimal exponent is a multiple of three.
fn engineering_parts(value: f64) -> (f64, i32) {
    if value == 0.0 || !value.is_finite() {
        return (value, 0);
    }
    let exponent = value.abs().log10().floor() as i32;
    let engineering = exponent.div_euclid(3) * 3;
    (value / 10f64.powi(engineering), engineering)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engineering_exponent_is_multiple_of_three() {
        let (m, e) = engineering_parts(4.0e4);
        assert_eq!(e, 3);
        assert!((m - 40.0).abs() < 1e-12);

        let (m, e) = engineering_parts(0.01);
        assert_eq!(e, -3);
        assert!((m - 10.0).abs() < 1e-12);
    }

    #[test]
    fn scientific_rendering() {
        assert_eq!(render_magnitude(1.0e5, FormatMode::Scientific), "1.000e5");
    }

    #[test]
    fn none_mode_keeps_full_precision() {
        assert_eq!(render_magnitude(5.0, FormatMode::None), "5");
        assert_eq!(render_magnitude(0.1, FormatMode::None), "0.1");
    }
}
