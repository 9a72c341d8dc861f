//! Conversion engine: validation, dispatch and display rounding
//!
//! Everything here is a pure function of its arguments and the static
//! category table.

use microtools_plugin::MAX_PRECISION;
use serde::{Deserialize, Serialize};
use crate::{Category, UnitDef, CATEGORIES};
use crate::parse::{check_finite, parse_value};
use crate::unit::ConversionError;

/// Look up a category by id or alias
pub fn category(name: &str) -> Result<&'static Category, ConversionError> {
    CATEGORIES.get(name).ok_or_else(|| ConversionError::UnknownCategory {
        category: name.to_string(),
        available: CATEGORIES.ids(),
    })
}

/// Look up a unit inside an already resolved category
pub fn unit_in<'a>(category: &'a Category, name: &str) -> Result<&'a UnitDef, ConversionError> {
    category.unit(name).ok_or_else(|| ConversionError::UnknownUnit {
        unit: name.to_string(),
        category: category.id,
        available: category.unit_ids(),
    })
}

/// Look up a unit by category and unit name
pub fn unit(category_name: &str, unit_name: &str) -> Result<&'static UnitDef, ConversionError> {
    unit_in(category(category_name)?, unit_name)
}

/// All categories in declaration order
pub fn categories() -> &'static [Category] {
    CATEGORIES.all()
}

/// Units of a category in declaration order
pub fn units(category_name: &str) -> Result<&'static [UnitDef], ConversionError> {
    Ok(category(category_name)?.units.as_slice())
}

/// Unit pair to select after switching to a category
pub fn default_units(category_name: &str) -> Result<(&'static UnitDef, &'static UnitDef), ConversionError> {
    let category = category(category_name)?;
    category.default_units().ok_or(ConversionError::EmptyCategory(category.id))
}

/// Convert `value` from one unit to another within a category.
///
/// Inputs are checked in order: value, category, source unit, target unit.
/// The result is the raw floating point value; use [`format_result`] for
/// display.
pub fn convert(value: f64, category_name: &str, from_unit: &str, to_unit: &str) -> Result<f64, ConversionError> {
    let value = check_finite(value)?;
    let category = category(category_name)?;
    let from = unit_in(category, from_unit)?;
    let to = unit_in(category, to_unit)?;
    from.convert_to(value, to)
}

/// Same as [`convert`] but starting from user-typed text
pub fn convert_text(text: &str, category_name: &str, from_unit: &str, to_unit: &str) -> Result<f64, ConversionError> {
    convert(parse_value(text)?, category_name, from_unit, to_unit)
}

/// Round to `decimals` fractional digits (at most [`MAX_PRECISION`]) and
/// strip trailing zeros
pub fn format_result(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let decimals = decimals.min(MAX_PRECISION) as usize;
    let fixed = format!("{:.*}", decimals, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Value of a conversion request, as a number or as typed text.
/// Any other JSON value is kept so it can be rejected as invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RequestValue {
    pub fn resolve(&self) -> Result<f64, ConversionError> {
        match self {
            RequestValue::Number(n) => check_finite(*n),
            RequestValue::Text(s) => parse_value(s),
            RequestValue::Other(v) => Err(ConversionError::InvalidInput(format!("{} is not a number", v))),
        }
    }
}

impl From<f64> for RequestValue {
    fn from(n: f64) -> Self {
        RequestValue::Number(n)
    }
}

impl From<&str> for RequestValue {
    fn from(s: &str) -> Self {
        RequestValue::Text(s.to_string())
    }
}

/// A single conversion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub value: RequestValue,
    pub category: String,
    pub from_unit: String,
    pub to_unit: String,
}

impl ConversionRequest {
    pub fn new(
        value: impl Into<RequestValue>,
        category: impl Into<String>,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
    ) -> Self {
        ConversionRequest {
            value: value.into(),
            category: category.into(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
        }
    }
}

/// Outcome of a successful conversion, with canonical names and labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub input: f64,
    pub value: f64,
    pub display: String,
    pub category: &'static str,
    pub from_unit: &'static str,
    pub to_unit: &'static str,
    pub from_label: &'static str,
    pub to_label: &'static str,
}

/// Evaluate a request and render the result with `decimals` fractional digits
pub fn convert_request(request: &ConversionRequest, decimals: u32) -> Result<ConversionResult, ConversionError> {
    let input = request.value.resolve()?;
    let category = category(&request.category)?;
    let from = unit_in(category, &request.from_unit)?;
    let to = unit_in(category, &request.to_unit)?;
    let value = from.convert_to(input, to)?;

    Ok(ConversionResult {
        input,
        value,
        display: format_result(value, decimals),
        category: category.id,
        from_unit: from.id,
        to_unit: to.id,
        from_label: from.label,
        to_label: to.label,
    })
}
