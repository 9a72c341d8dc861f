//! Parsing of user input: numeric values and category/unit names

use crate::unit::ConversionError;

/// Normalize a category or unit name for lookup (lowercase, trim, standardize separators)
pub fn normalize_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a value typed by the user.
///
/// Accepts anything `f64` parses (`12`, `-3.5`, `1e3`) after trimming, and
/// rejects empty text, garbage, NaN and infinities.
pub fn parse_value(text: &str) -> Result<f64, ConversionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::InvalidInput("empty value".to_string()));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ConversionError::InvalidInput(format!("'{}' is not a number", trimmed)))?;

    check_finite(value)
}

/// Reject NaN and infinities
pub fn check_finite(value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::InvalidInput(format!("{} is not a finite number", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Data_Storage"), "data storage");
        assert_eq!(normalize_key("  Miles   per-Hour "), "miles per hour");
        assert_eq!(normalize_key("km/h"), "km/h");
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), Ok(42.0));
        assert_eq!(parse_value("  -3.5 "), Ok(-3.5));
        assert_eq!(parse_value("1e3"), Ok(1000.0));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        for bad in ["abc", "", "   ", "12abc", "NaN", "inf", "-infinity"] {
            let result = parse_value(bad);
            assert!(
                matches!(result, Err(ConversionError::InvalidInput(_))),
                "expected InvalidInput for {:?}, got {:?}", bad, result
            );
        }
    }

    #[test]
    fn test_check_finite() {
        assert_eq!(check_finite(1.5), Ok(1.5));
        assert!(check_finite(f64::NAN).is_err());
        assert!(check_finite(f64::NEG_INFINITY).is_err());
    }
}
