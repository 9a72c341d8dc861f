//! Argument extraction shared by the unit functions

use microtools_core::{ToolError, Value};
use microtools_plugin::MAX_PRECISION;
use crate::parse::{check_finite, parse_value};
use crate::unit::ConversionError;

/// Extract a conversion value: a Number, or Text typed by the user.
/// Anything else is not a finite number and is rejected as invalid input.
pub fn extract_value(value: &Value) -> Result<f64, ToolError> {
    let parsed = match value {
        Value::Number(n) => check_finite(*n),
        Value::Text(s) => parse_value(s),
        Value::Error(e) => return Err(e.clone()),
        other => Err(ConversionError::InvalidInput(format!("{} is not a number", other.type_name()))),
    };
    parsed.map_err(ToolError::from)
}

/// Extract a digit count, clamped to [`MAX_PRECISION`]
pub fn extract_decimals(value: &Value, func: &str, arg: &str) -> Result<u32, ToolError> {
    match value {
        Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
            Ok(n.min(MAX_PRECISION as f64) as u32)
        }
        Value::Error(e) => Err(e.clone()),
        other => Err(ToolError::arg_type(func, arg, "non-negative integer", other.type_name())),
    }
}

/// Extract a Text string from a Value
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, ToolError> {
    match value {
        Value::Text(s) => Ok(s.as_str()),
        Value::Error(e) => Err(e.clone()),
        other => Err(ToolError::arg_type(func, arg, "Text", other.type_name())),
    }
}

pub fn check_arg_count(args: &[Value], func: &str, expected: usize) -> Result<(), ToolError> {
    if args.len() < expected {
        return Err(ToolError::arg_count(func, expected, args.len()));
    }
    Ok(())
}

impl From<ConversionError> for ToolError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidInput(details) => ToolError::invalid_input(details),
            ConversionError::UnknownCategory { category, available } => {
                ToolError::unknown_category(&category)
                    .with_suggestion(format!("Available categories: {}", available.join(", ")))
            }
            ConversionError::UnknownUnit { unit, category, available } => {
                ToolError::unknown_unit(&unit, category)
                    .with_suggestion(format!("Units in {}: {}", category, available.join(", ")))
            }
            other @ (ConversionError::EmptyCategory(_) | ConversionError::MismatchedConversion { .. }) => {
                ToolError::internal(other.to_string())
            }
        }
    }
}
