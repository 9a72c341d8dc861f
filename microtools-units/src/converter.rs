//! Interactive converter state
//!
//! Mirrors a converter form: a category selector, a value field and two unit
//! selectors. Every change recomputes the result; a rejected input leaves the
//! result unset and records why.

use tracing::debug;
use crate::engine::{category, convert, format_result, unit_in};
use crate::parse::parse_value;
use crate::unit::ConversionError;
use microtools_plugin::{DEFAULT_PRECISION, MAX_PRECISION};

#[derive(Debug, Clone)]
pub struct UnitConverter {
    category: &'static str,
    from_unit: &'static str,
    to_unit: &'static str,
    input: String,
    precision: u32,
    value: Option<f64>,
    result: Option<String>,
    error: Option<ConversionError>,
}

impl UnitConverter {
    /// Start on `category` with its default unit pair and an empty value
    pub fn new(category_name: &str) -> Result<Self, ConversionError> {
        let mut converter = UnitConverter {
            category: "",
            from_unit: "",
            to_unit: "",
            input: String::new(),
            precision: DEFAULT_PRECISION,
            value: None,
            result: None,
            error: None,
        };
        converter.select_category(category_name)?;
        Ok(converter)
    }

    /// Display precision, clamped to [`MAX_PRECISION`]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.min(MAX_PRECISION);
        self.recompute();
        self
    }

    /// Switch category. Units are reset to the new category's defaults.
    /// An unknown category leaves the state untouched.
    pub fn select_category(&mut self, name: &str) -> Result<(), ConversionError> {
        let category = category(name)?;
        let (from, to) = category
            .default_units()
            .ok_or(ConversionError::EmptyCategory(category.id))?;

        self.category = category.id;
        self.from_unit = from.id;
        self.to_unit = to.id;
        self.recompute();
        Ok(())
    }

    pub fn select_from(&mut self, name: &str) -> Result<(), ConversionError> {
        self.from_unit = unit_in(category(self.category)?, name)?.id;
        self.recompute();
        Ok(())
    }

    pub fn select_to(&mut self, name: &str) -> Result<(), ConversionError> {
        self.to_unit = unit_in(category(self.category)?, name)?.id;
        self.recompute();
        Ok(())
    }

    pub fn swap_units(&mut self) {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
        self.recompute();
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.recompute();
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn from_unit(&self) -> &'static str {
        self.from_unit
    }

    pub fn to_unit(&self) -> &'static str {
        self.to_unit
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Raw converted value
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Display-rounded result
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&ConversionError> {
        self.error.as_ref()
    }

    fn recompute(&mut self) {
        self.value = None;
        self.result = None;
        self.error = None;

        // An empty field is not an error, there is just nothing to show
        if self.input.trim().is_empty() {
            return;
        }

        let outcome = parse_value(&self.input)
            .and_then(|v| convert(v, self.category, self.from_unit, self.to_unit));

        match outcome {
            Ok(value) => {
                self.value = Some(value);
                self.result = Some(format_result(value, self.precision));
            }
            Err(e) => {
                debug!(category = self.category, input = %self.input, error = %e, "conversion rejected");
                self.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::categories;

    #[test]
    fn test_starts_with_defaults() {
        let converter = UnitConverter::new("length").unwrap();
        assert_eq!(converter.from_unit(), "meters");
        assert_eq!(converter.to_unit(), "kilometers");
        assert_eq!(converter.result(), None);
        assert!(converter.error().is_none());
    }

    #[test]
    fn test_input_recomputes() {
        let mut converter = UnitConverter::new("length").unwrap();
        converter.set_input("1500");
        assert_eq!(converter.result(), Some("1.5"));

        converter.swap_units();
        assert_eq!(converter.from_unit(), "kilometers");
        assert_eq!(converter.result(), Some("1500000"));
    }

    #[test]
    fn test_category_switch_resets_units() {
        let mut converter = UnitConverter::new("length").unwrap();
        converter.select_to("feet").unwrap();

        for category in categories() {
            converter.select_category(category.id).unwrap();
            assert_eq!(converter.category(), category.id);
            assert!(category.unit(converter.from_unit()).is_some());
            assert!(category.unit(converter.to_unit()).is_some());
            assert_eq!(converter.from_unit(), category.units[0].id);
        }
    }

    #[test]
    fn test_category_switch_keeps_input() {
        let mut converter = UnitConverter::new("temperature").unwrap();
        converter.set_input("100");
        assert_eq!(converter.result(), Some("212"));

        converter.select_category("data storage").unwrap();
        assert_eq!((converter.from_unit(), converter.to_unit()), ("bytes", "bits"));
        assert_eq!(converter.result(), Some("800"));
    }

    #[test]
    fn test_unknown_category_leaves_state() {
        let mut converter = UnitConverter::new("time").unwrap();
        let err = converter.select_category("colour").unwrap_err();
        assert!(matches!(err, ConversionError::UnknownCategory { .. }));
        assert_eq!(converter.category(), "time");
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let mut converter = UnitConverter::new("time").unwrap();
        let err = converter.select_from("meters").unwrap_err();
        assert!(matches!(err, ConversionError::UnknownUnit { .. }));
        assert_eq!(converter.from_unit(), "seconds");
    }

    #[test]
    fn test_invalid_input_clears_result() {
        let mut converter = UnitConverter::new("time").unwrap();
        converter.select_from("minutes").unwrap();
        converter.select_to("seconds").unwrap();
        converter.set_input("60");
        assert_eq!(converter.value(), Some(3600.0));

        converter.set_input("abc");
        assert_eq!(converter.result(), None);
        assert_eq!(converter.value(), None);
        assert!(matches!(converter.error(), Some(ConversionError::InvalidInput(_))));

        converter.set_input("");
        assert!(converter.error().is_none());
    }

    #[test]
    fn test_precision() {
        let mut converter = UnitConverter::new("length").unwrap().with_precision(2);
        converter.select_from("kilometers").unwrap();
        converter.select_to("miles").unwrap();
        converter.set_input("5");
        assert_eq!(converter.result(), Some("3.11"));
    }

    #[test]
    fn test_precision_clamped() {
        let mut converter = UnitConverter::new("length").unwrap().with_precision(25);
        converter.set_input("1");
        assert_eq!(converter.result(), Some("0.001"));
    }
}
