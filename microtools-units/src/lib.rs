//! Microtools Units - Unit Conversion Engine
//!
//! Converts a value between two units of the same category. Each category
//! has a base unit; other units are either a scale factor relative to it or,
//! for temperature, an affine to/from pair.
//!
//! Categories:
//! - Length (meters, kilometers, miles, feet, ...)
//! - Mass (kilograms, grams, pounds, ounces, ...)
//! - Volume (liters, milliliters, gallons, cups, ...)
//! - Temperature (celsius, fahrenheit, kelvin)
//! - Time (seconds, minutes, hours, ..., average months and years)
//! - Speed (m/s, km/h, mph, knots, ...)
//! - Area (square meters, acres, hectares, ...)
//! - Data storage (bytes, bits, binary kilobytes, ...)

mod unit;
mod category;
mod units;
mod parse;
mod engine;
mod converter;
mod helpers;
mod convert;

pub use unit::{Conversion, ConversionError, UnitDef};
pub use category::{Category, CategoryInfo, CategoryKind, UnitInfo, UnitPair};
pub use units::{CategoryRegistry, CATEGORIES};
pub use parse::{normalize_key, parse_value};
pub use engine::{
    categories, category, convert, convert_request, convert_text, default_units,
    format_result, unit, units, ConversionRequest, ConversionResult, RequestValue,
};
pub use converter::UnitConverter;

use microtools_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversion (2 functions)
        .with_function(convert::Convert)
        .with_function(convert::FormatUnits)

        // Inspection (3 functions)
        .with_function(convert::ListCategories)
        .with_function(convert::ListUnits)
        .with_function(convert::DefaultUnits)
}

/// Registry with every unit function loaded
pub fn units_registry() -> PluginRegistry {
    load_units_library(PluginRegistry::new())
}
