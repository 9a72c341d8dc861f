//! Unit representation with conversion descriptors

use std::fmt;
use thiserror::Error;

/// How a unit maps onto its category's base unit
#[derive(Debug, Clone, Copy)]
pub enum Conversion {
    /// 1 unit equals `factor` base units
    Linear(f64),
    /// Non-proportional mapping (temperature). `from_base(to_base(x)) == x`
    Affine {
        to_base: fn(f64) -> f64,
        from_base: fn(f64) -> f64,
    },
}

impl Conversion {
    /// Convert a value in this unit to the base unit
    pub fn to_base(&self, value: f64) -> f64 {
        match self {
            Conversion::Linear(factor) => value * factor,
            Conversion::Affine { to_base, .. } => to_base(value),
        }
    }

    /// Convert a value in the base unit to this unit
    pub fn from_base(&self, value: f64) -> f64 {
        match self {
            Conversion::Linear(factor) => value / factor,
            Conversion::Affine { from_base, .. } => from_base(value),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Conversion::Linear(_))
    }
}

/// A unit inside a category
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    /// Canonical identifier (e.g. "kilometers")
    pub id: &'static str,
    /// Display label (e.g. "Kilometers (km)")
    pub label: &'static str,
    pub conversion: Conversion,
}

impl UnitDef {
    pub const fn linear(id: &'static str, label: &'static str, factor: f64) -> Self {
        UnitDef { id, label, conversion: Conversion::Linear(factor) }
    }

    pub const fn affine(
        id: &'static str,
        label: &'static str,
        to_base: fn(f64) -> f64,
        from_base: fn(f64) -> f64,
    ) -> Self {
        UnitDef { id, label, conversion: Conversion::Affine { to_base, from_base } }
    }

    /// Convert a value from this unit to another unit of the same category
    pub fn convert_to(&self, value: f64, target: &UnitDef) -> Result<f64, ConversionError> {
        if self.id == target.id {
            return Ok(value);
        }

        let result = match (self.conversion, target.conversion) {
            (Conversion::Linear(from), Conversion::Linear(to)) => value * from / to,
            (Conversion::Affine { to_base, .. }, Conversion::Affine { from_base, .. }) => {
                from_base(to_base(value))
            }
            _ => {
                return Err(ConversionError::MismatchedConversion {
                    from: self.id.to_string(),
                    to: target.id.to_string(),
                })
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(ConversionError::InvalidInput(format!(
                "{} {} is out of range in {}", value, self.id, target.id
            )))
        }
    }
}

impl fmt::Display for UnitDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Value is not a finite number
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown category: {category}")]
    UnknownCategory {
        category: String,
        available: Vec<&'static str>,
    },

    /// Unit is not part of the selected category
    #[error("unknown unit '{unit}' for category '{category}'")]
    UnknownUnit {
        unit: String,
        category: &'static str,
        available: Vec<&'static str>,
    },

    #[error("category '{0}' has no units")]
    EmptyCategory(&'static str),

    /// A linear and an affine unit ended up in the same category
    #[error("cannot convert between '{from}' and '{to}': mismatched conversion kinds")]
    MismatchedConversion { from: String, to: String },
}
