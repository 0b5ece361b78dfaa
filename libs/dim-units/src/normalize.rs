//! Dimension-to-symbol normalization.
//!
//! Turns a bag of seven exponents into the shortest reasonable unit string
//! a person would write: a named unit when one matches, otherwise one
//! derived unit plus residual base units.

use crate::dimension::{Dimension, AXES};
use crate::registry::Registry;
use crate::unit::Unit;

/// Tie-break order when two derived units reduce complexity equally.
const DERIVED_PRIORITY: &[&str] = &["N", "J", "W", "Pa", "m/s^2", "m/s", "m^2", "m^3"];

/// Default base symbols per axis, used when the registry does not define a
/// scale-1 unit for an axis.
const DEFAULT_BASIS: [&str; AXES] = ["m", "kg", "s", "A", "K", "mol", "cd"];

/// Render `dim` as a unit string against `registry`.
///
/// Resolution order: an alias whose target names the dimension, an exact
/// scale-1 unit, any same-dimension unit as fallback, then a one-step
/// derived reduction followed by residual base units. Affine units never
/// participate, so the temperature axis always renders as `K`.
/// A dimensionless input returns `fallback`.
pub fn normalize(dim: Dimension, registry: &Registry, fallback: &str) -> String {
    if dim.is_zero() {
        return fallback.to_string();
    }

    // Alias hit: a secondary name marks the unit as the preferred spelling
    // for its dimension.
    for alias in registry.aliases() {
        if let Some(unit) = registry.find_exact(&alias.target) {
            if unit.dim == dim && unit.scale == 1.0 && !unit.is_affine() {
                return unit.symbol.clone();
            }
        }
    }

    // Exact unit hit; remember a same-dimension unit at another scale in
    // case no coherent symbol exists.
    let mut scaled_match: Option<&Unit> = None;
    for unit in registry.units() {
        if unit.is_affine() || unit.dim != dim {
            continue;
        }
        if unit.scale == 1.0 {
            return unit.symbol.clone();
        }
        if scaled_match.is_none() {
            scaled_match = Some(unit);
        }
    }
    if let Some(unit) = scaled_match {
        return unit.symbol.clone();
    }

    // One-step derived reduction.
    let mut best: Option<(&Unit, u32)> = None;
    for unit in registry.units() {
        if unit.is_affine() || unit.scale != 1.0 || unit.dim.is_zero() {
            continue;
        }
        if unit.dim.single_axis().is_some() {
            continue;
        }
        let residual = dim - unit.dim;
        if residual.complexity() >= dim.complexity() {
            continue;
        }
        let reduction = dim.complexity() - residual.complexity();
        let better = match best {
            None => true,
            Some((current, current_reduction)) => {
                reduction > current_reduction
                    || (reduction == current_reduction
                        && priority_rank(&unit.symbol) < priority_rank(&current.symbol))
            }
        };
        if better {
            best = Some((unit, reduction));
        }
    }

    let (head, residual) = match best {
        Some((unit, _)) => (Some(unit.symbol.clone()), dim - unit.dim),
        None => (None, dim),
    };

    render(head, residual, &basis_symbols(registry), fallback)
}

fn priority_rank(symbol: &str) -> usize {
    DERIVED_PRIORITY
        .iter()
        .position(|&s| s == symbol)
        .unwrap_or(DERIVED_PRIORITY.len() + symbol.len())
}

/// Per-axis base symbols: scale-1 single-axis units from the registry,
/// falling back to the SI defaults for axes the registry does not cover.
fn basis_symbols(registry: &Registry) -> [String; AXES] {
    let mut basis = DEFAULT_BASIS.map(String::from);
    let mut found = [false; AXES];
    for unit in registry.units() {
        if unit.scale != 1.0 || unit.is_affine() {
            continue;
        }
        if let Some(axis) = unit.dim.single_axis() {
            if !found[axis] {
                basis[axis] = unit.symbol.clone();
                found[axis] = true;
            }
        }
    }
    basis
}

/// Emit `head`, positive-exponent bases joined by `*`, then each
/// negative-exponent base behind its own `/` so the result re-parses as a
/// unit expression. A purely negative result starts with the literal `1`.
fn render(head: Option<String>, residual: Dimension, basis: &[String; AXES], fallback: &str) -> String {
    let mut out = head.unwrap_or_default();

    for (axis, &exp) in residual.0.iter().enumerate() {
        if exp <= 0 {
            continue;
        }
        if !out.is_empty() {
            out.push('*');
        }
        out.push_str(&basis[axis]);
        if exp > 1 {
            out.push('^');
            out.push_str(&exp.to_string());
        }
    }

    for (axis, &exp) in residual.0.iter().enumerate() {
        if exp >= 0 {
            continue;
        }
        if out.is_empty() {
            out.push('1');
        }
        out.push('/');
        out.push_str(&basis[axis]);
        if exp < -1 {
            out.push('^');
            out.push_str(&(-exp).to_string());
        }
    }

    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn named_dimensions_use_their_symbol() {
        let si = catalog::si_registry();
        assert_eq!(normalize(Dimension::new(1, 1, -2, 0, 0, 0, 0), si, ""), "N");
        assert_eq!(normalize(Dimension::new(0, 0, -1, 0, 0, 0, 0), si, ""), "Hz");
        assert_eq!(normalize(Dimension::new(1, 0, -1, 0, 0, 0, 0), si, ""), "m/s");
    }

    #[test]
    fn temperature_renders_as_kelvin_not_celsius() {
        let si = catalog::si_registry();
        assert_eq!(normalize(Dimension::TEMPERATURE, si, ""), "K");
    }

    #[test]
    fn momentum_reduces_through_newton() {
        let si = catalog::si_registry();
        assert_eq!(normalize(Dimension::new(1, 1, -1, 0, 0, 0, 0), si, ""), "N*s");
    }

    #[test]
    fn purely_negative_residual_keeps_a_numerator() {
        let si = catalog::si_registry();
        assert_eq!(
            normalize(Dimension::new(0, 0, 0, -1, 0, 0, 0), si, ""),
            "1/A"
        );
    }

    #[test]
    fn dimensionless_falls_back() {
        let si = catalog::si_registry();
        assert_eq!(normalize(Dimension::ZERO, si, "m/m"), "m/m");
    }
}
