//! Session-scoped constants.
//!
//! A constant is a synthetic unit derived from an evaluated quantity: its
//! scale is the quantity's canonical magnitude, its offset zero. Names keep
//! their first insertion position across redefinition so `list` output is
//! stable.

use crate::value::Quantity;
use dim_units::Unit;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ConstantsTable {
    entries: HashMap<String, Unit>,
    order: Vec<String>,
}

impl ConstantsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or replace a constant from an evaluated quantity.
    pub fn define(&mut self, name: &str, quantity: &Quantity) {
        let unit = Unit::new(name, quantity.dim, quantity.value);
        if self.entries.insert(name.to_string(), unit).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.entries.get(name)
    }

    /// Remove a constant; returns whether it existed.
    pub fn clear(&mut self, name: &str) -> bool {
        if self.entries.remove(name).is_some() {
            self.order.retain(|n| n != name);
            true
        } else {
            false
        }
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Constants in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dim_units::Dimension;

    fn quantity(value: f64) -> Quantity {
        Quantity::new(value, Dimension::TIME, "s")
    }

    #[test]
    fn redefinition_keeps_listing_position() {
        let mut table = ConstantsTable::new();
        table.define("d", &quantity(86400.0));
        table.define("wk", &quantity(604800.0));
        table.define("d", &quantity(86401.0));

        let names: Vec<&str> = table.iter().map(|u| u.symbol.as_str()).collect();
        assert_eq!(names, vec!["d", "wk"]);
        assert_eq!(table.get("d").unwrap().scale, 86401.0);
    }

    #[test]
    fn clear_removes_from_both_structures() {
        let mut table = ConstantsTable::new();
        table.define("d", &quantity(86400.0));
        assert!(table.clear("d"));
        assert!(!table.clear("d"));
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }
}
