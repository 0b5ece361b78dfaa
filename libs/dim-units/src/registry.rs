//! Per-system unit registries.
//!
//! A registry bundles units, aliases and metric prefixes for one unit
//! system. Lookup is isolated per registry: a prefix defined here never
//! applies to another registry's units.

use crate::dimension::Dimension;
use crate::unit::Unit;

/// A secondary name bound to a unit in the same registry
/// (e.g. `Newton` for `N`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub target: String,
}

/// A multiplicative prefix (e.g. `k` = 1e3).
#[derive(Clone, Debug, PartialEq)]
pub struct Prefix {
    pub symbol: String,
    pub factor: f64,
}

/// Units, aliases and prefixes for one unit system.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    name: &'static str,
    units: Vec<Unit>,
    aliases: Vec<Alias>,
    prefixes: Vec<Prefix>,
}

impl Registry {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            units: Vec::new(),
            aliases: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn add_unit(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn unit(&mut self, symbol: &str, dim: Dimension, scale: f64) {
        self.units.push(Unit::new(symbol, dim, scale));
    }

    pub fn affine_unit(&mut self, symbol: &str, dim: Dimension, scale: f64, offset: f64) {
        self.units.push(Unit::affine(symbol, dim, scale, offset));
    }

    pub fn alias(&mut self, name: &str, target: &str) {
        debug_assert!(
            self.units.iter().any(|u| u.symbol == target),
            "alias '{name}' targets unknown unit '{target}'"
        );
        self.aliases.push(Alias {
            name: name.into(),
            target: target.into(),
        });
    }

    pub fn prefix(&mut self, symbol: &str, factor: f64) {
        self.prefixes.push(Prefix {
            symbol: symbol.into(),
            factor,
        });
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    /// Look up `sym` among units and aliases, without prefix expansion.
    pub fn find_exact(&self, sym: &str) -> Option<&Unit> {
        if let Some(unit) = self.units.iter().find(|u| u.symbol == sym) {
            return Some(unit);
        }
        self.aliases
            .iter()
            .find(|a| a.name == sym)
            .and_then(|a| self.units.iter().find(|u| u.symbol == a.target))
    }

    /// Full lookup: exact, then alias, then prefix + base.
    ///
    /// A prefixed hit yields a synthetic unit whose scale is
    /// `base.scale * prefix.factor`, keeping the base offset and reporting
    /// the input symbol as its name.
    pub fn find(&self, sym: &str) -> Option<Unit> {
        if let Some(unit) = self.find_exact(sym) {
            return Some(unit.clone());
        }
        for prefix in &self.prefixes {
            let Some(rest) = sym.strip_prefix(prefix.symbol.as_str()) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            if let Some(base) = self.find_exact(rest) {
                return Some(Unit {
                    symbol: sym.into(),
                    dim: base.dim,
                    scale: base.scale * prefix.factor,
                    offset: base.offset,
                });
            }
        }
        None
    }
}
