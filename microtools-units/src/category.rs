//! Unit categories
//!
//! A category groups units that can be converted into each other. Every
//! unit is expressed relative to the category's base unit.

use std::collections::HashMap;
use serde::Serialize;
use crate::UnitDef;
use crate::parse::normalize_key;

/// How the units of a category relate to the base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Plain scale factors
    Linear,
    /// Scale and offset (temperature)
    Affine,
}

/// A named group of mutually convertible units
#[derive(Debug, Clone)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
    pub base: &'static str,
    /// Units in declaration order
    pub units: Vec<UnitDef>,
    lookup: HashMap<String, usize>,
}

impl Category {
    pub(crate) fn new(id: &'static str, label: &'static str, base: &'static str) -> Self {
        Category {
            id,
            label,
            base,
            units: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Add a unit along with the extra spellings it answers to
    pub(crate) fn with_unit(mut self, unit: UnitDef, aliases: &[&str]) -> Self {
        let index = self.units.len();
        self.lookup.insert(normalize_key(unit.id), index);
        for alias in aliases {
            self.lookup.entry(normalize_key(alias)).or_insert(index);
        }
        self.units.push(unit);
        self
    }

    /// Look up a unit by id or alias
    pub fn unit(&self, name: &str) -> Option<&UnitDef> {
        if let Some(unit) = self.units.iter().find(|u| u.id == name) {
            return Some(unit);
        }
        self.lookup.get(&normalize_key(name)).map(|&i| &self.units[i])
    }

    pub fn base_unit(&self) -> Option<&UnitDef> {
        self.unit(self.base)
    }

    pub fn kind(&self) -> CategoryKind {
        match self.base_unit() {
            Some(unit) if !unit.conversion.is_linear() => CategoryKind::Affine,
            _ => CategoryKind::Linear,
        }
    }

    pub fn unit_ids(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.id).collect()
    }

    /// Unit pair selected after switching to this category: first and
    /// second declared unit, or the first one twice.
    pub fn default_units(&self) -> Option<(&UnitDef, &UnitDef)> {
        let first = self.units.first()?;
        let second = self.units.get(1).unwrap_or(first);
        Some((first, second))
    }

    /// Serializable summary used by listings
    pub fn describe(&self) -> CategoryInfo {
        let defaults = self.default_units().map(|(from, to)| UnitPair {
            from: from.id,
            to: to.id,
        });
        CategoryInfo {
            id: self.id,
            label: self.label,
            base: self.base,
            kind: self.kind(),
            units: self.units.iter()
                .map(|u| UnitInfo { id: u.id, label: u.label, base: u.id == self.base })
                .collect(),
            defaults,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub base: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitPair {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub base: &'static str,
    pub kind: CategoryKind,
    pub units: Vec<UnitInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<UnitPair>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Category {
        Category::new("length", "Length", "meters")
            .with_unit(UnitDef::linear("meters", "Meters (m)", 1.0), &["m", "metre"])
            .with_unit(UnitDef::linear("kilometers", "Kilometers (km)", 1000.0), &["km"])
            .with_unit(UnitDef::linear("feet", "Feet (ft)", 0.3048), &["ft", "foot"])
    }

    #[test]
    fn test_lookup_by_id_and_alias() {
        let cat = sample();
        assert_eq!(cat.unit("kilometers").map(|u| u.id), Some("kilometers"));
        assert_eq!(cat.unit("KM").map(|u| u.id), Some("kilometers"));
        assert_eq!(cat.unit("  Foot ").map(|u| u.id), Some("feet"));
        assert!(cat.unit("parsec").is_none());
    }

    #[test]
    fn test_defaults_first_and_second() {
        let cat = sample();
        let (from, to) = cat.default_units().unwrap();
        assert_eq!((from.id, to.id), ("meters", "kilometers"));
    }

    #[test]
    fn test_defaults_single_unit() {
        let cat = Category::new("solo", "Solo", "things")
            .with_unit(UnitDef::linear("things", "Things", 1.0), &[]);
        let (from, to) = cat.default_units().unwrap();
        assert_eq!((from.id, to.id), ("things", "things"));
    }

    #[test]
    fn test_defaults_empty() {
        let cat = Category::new("empty", "Empty", "none");
        assert!(cat.default_units().is_none());
        assert!(cat.describe().defaults.is_none());
    }

    #[test]
    fn test_describe() {
        let info = sample().describe();
        assert_eq!(info.kind, CategoryKind::Linear);
        assert_eq!(info.units.len(), 3);
        assert!(info.units[0].base);
        assert!(!info.units[1].base);
        assert_eq!(info.defaults, Some(UnitPair { from: "meters", to: "kilometers" }));
    }
}
