//! Unit conversion functions exposed through the plugin registry

use microtools_plugin::prelude::*;
use crate::category::{Category, CategoryInfo};
use crate::engine::{self, format_result};
use crate::helpers::{check_arg_count, extract_decimals, extract_text, extract_value};

fn to_value(result: Result<Value, ToolError>) -> Value {
    result.unwrap_or_else(Value::Error)
}

fn info_to_value(info: &CategoryInfo) -> Value {
    Value::object([
        ("id", Value::from(info.id)),
        ("label", Value::from(info.label)),
        ("base", Value::from(info.base)),
        ("kind", Value::from(match info.kind {
            crate::CategoryKind::Linear => "linear",
            crate::CategoryKind::Affine => "affine",
        })),
        ("units", Value::List(info.units.iter().map(|u| Value::object([
            ("id", Value::from(u.id)),
            ("label", Value::from(u.label)),
            ("base", Value::Bool(u.base)),
        ])).collect())),
    ])
}

/// Shared argument handling for convert/format_units
fn convert_number(func: &str, args: &[Value]) -> Result<f64, ToolError> {
    check_arg_count(args, func, 4)?;
    let value = extract_value(&args[0])?;
    let category = engine::category(extract_text(&args[1], func, "category")?)?;
    let from = engine::unit_in(category, extract_text(&args[2], func, "from_unit")?)?;
    let to = engine::unit_in(category, extract_text(&args[3], func, "to_unit")?)?;
    Ok(from.convert_to(value, to)?)
}

fn format_number(args: &[Value], ctx: &EvalContext) -> Result<Value, ToolError> {
    let result = convert_number("format_units", args)?;
    let decimals = match args.get(4) {
        Some(arg) => extract_decimals(arg, "format_units", "decimals")?,
        None => ctx.precision,
    };
    Ok(Value::Text(format_result(result, decimals)))
}

fn category_arg(func: &str, args: &[Value]) -> Result<&'static Category, ToolError> {
    check_arg_count(args, func, 1)?;
    Ok(engine::category(extract_text(&args[0], func, "category")?)?)
}

fn default_pair(args: &[Value]) -> Result<Value, ToolError> {
    let category = category_arg("default_units", args)?;
    let (from, to) = engine::default_units(category.id)?;
    Ok(Value::object([
        ("from", Value::from(from.id)),
        ("to", Value::from(to.id)),
    ]))
}

const VALUE_ARG: ArgMeta = ArgMeta::required("value", "Number", "Value to convert (a Number, or Text such as \"12.5\")");
const CATEGORY_ARG: ArgMeta = ArgMeta::required("category", "Text", "Category (e.g., \"length\", \"temperature\", \"data storage\")");
const FROM_UNIT_ARG: ArgMeta = ArgMeta::required("from_unit", "Text", "Source unit (e.g., \"kilometers\" or \"km\")");
const TO_UNIT_ARG: ArgMeta = ArgMeta::required("to_unit", "Text", "Target unit (e.g., \"meters\" or \"m\")");

static CONVERT_ARGS: [ArgMeta; 4] = [VALUE_ARG, CATEGORY_ARG, FROM_UNIT_ARG, TO_UNIT_ARG];

// ============ convert ============

pub struct Convert;

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(1, \"length\", \"kilometers\", \"meters\") → 1000",
    "convert(100, \"temperature\", \"celsius\", \"fahrenheit\") → 212",
    "convert(1, \"data storage\", \"kilobytes\", \"bytes\") → 1024",
];

static CONVERT_RELATED: [&str; 3] = ["format_units", "list_units", "default_units"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert a value from one unit to another within a category",
            usage: "convert(value, category, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Number",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(convert_number("convert", args).map(Value::Number))
    }
}

// ============ format_units ============

pub struct FormatUnits;

static FORMAT_UNITS_ARGS: [ArgMeta; 5] = [
    VALUE_ARG,
    CATEGORY_ARG,
    FROM_UNIT_ARG,
    TO_UNIT_ARG,
    ArgMeta::optional("decimals", "Number", "Fractional digits, at most 15", "context precision"),
];

static FORMAT_UNITS_EXAMPLES: [&str; 3] = [
    "format_units(5, \"length\", \"km\", \"mi\") → \"3.106856\"",
    "format_units(5, \"length\", \"km\", \"mi\", 2) → \"3.11\"",
    "format_units(0, \"temperature\", \"C\", \"K\") → \"273.15\"",
];

static FORMAT_UNITS_RELATED: [&str; 1] = ["convert"];

impl FunctionPlugin for FormatUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_units",
            description: "Convert a value and round it for display (trailing zeros removed)",
            usage: "format_units(value, category, from_unit, to_unit, [decimals])",
            args: &FORMAT_UNITS_ARGS,
            returns: "Text",
            examples: &FORMAT_UNITS_EXAMPLES,
            category: "units",
            related: &FORMAT_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        to_value(format_number(args, ctx))
    }
}

// ============ list_categories ============

pub struct ListCategories;

static LIST_CATEGORIES_EXAMPLES: [&str; 1] = [
    "list_categories() → [{id: \"length\", base: \"meters\", ...}, ...]",
];

static LIST_CATEGORIES_RELATED: [&str; 2] = ["list_units", "default_units"];

impl FunctionPlugin for ListCategories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_categories",
            description: "List unit categories with their units, in display order",
            usage: "list_categories()",
            args: &[],
            returns: "List",
            examples: &LIST_CATEGORIES_EXAMPLES,
            category: "units",
            related: &LIST_CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        Value::List(engine::categories().iter()
            .map(|c| info_to_value(&c.describe()))
            .collect())
    }
}

// ============ list_units ============

pub struct ListUnits;

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "Text", "Category name or alias"),
];

static LIST_UNITS_EXAMPLES: [&str; 1] = [
    "list_units(\"temperature\") → [{id: \"celsius\", ...}, {id: \"fahrenheit\", ...}, {id: \"kelvin\", ...}]",
];

static LIST_UNITS_RELATED: [&str; 2] = ["list_categories", "default_units"];

impl FunctionPlugin for ListUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_units",
            description: "List the units of a category",
            usage: "list_units(category)",
            args: &LIST_UNITS_ARGS,
            returns: "List",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &LIST_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(category_arg("list_units", args)
            .map(|category| info_to_value(&category.describe()).get("units")))
    }
}

// ============ default_units ============

pub struct DefaultUnits;

static DEFAULT_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "Text", "Category name or alias"),
];

static DEFAULT_UNITS_EXAMPLES: [&str; 2] = [
    "default_units(\"length\") → {from: \"meters\", to: \"kilometers\"}",
    "default_units(\"temperature\") → {from: \"celsius\", to: \"fahrenheit\"}",
];

static DEFAULT_UNITS_RELATED: [&str; 1] = ["list_units"];

impl FunctionPlugin for DefaultUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "default_units",
            description: "Unit pair selected after switching to a category",
            usage: "default_units(category)",
            args: &DEFAULT_UNITS_ARGS,
            returns: "Object {from: Text, to: Text}",
            examples: &DEFAULT_UNITS_EXAMPLES,
            category: "units",
            related: &DEFAULT_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        to_value(default_pair(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ctx() -> EvalContext {
        EvalContext::new()
    }

    fn texts(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_convert_length() {
        let mut args = vec![Value::Number(1.0)];
        args.extend(texts(&["length", "km", "m"]));
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_number(), Some(1000.0));
    }

    #[test]
    fn test_convert_temperature() {
        let mut args = vec![Value::Number(0.0)];
        args.extend(texts(&["temperature", "celsius", "kelvin"]));
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_number(), Some(273.15));
    }

    #[test]
    fn test_convert_text_value() {
        let args = texts(&["60", "time", "minutes", "seconds"]);
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_number(), Some(3600.0));
    }

    #[test]
    fn test_convert_errors() {
        let args = texts(&["abc", "time", "minutes", "seconds"]);
        let err = Convert.call(&args, &eval_ctx());
        assert!(err.as_error().unwrap().is_code(codes::INVALID_INPUT));

        let mut args = vec![Value::Number(1.0)];
        args.extend(texts(&["colour", "red", "blue"]));
        let err = Convert.call(&args, &eval_ctx());
        assert!(err.as_error().unwrap().is_code(codes::UNKNOWN_CATEGORY));

        let mut args = vec![Value::Number(1.0)];
        args.extend(texts(&["length", "meters", "celsius"]));
        let err = Convert.call(&args, &eval_ctx());
        assert!(err.as_error().unwrap().is_code(codes::UNKNOWN_UNIT));

        let err = Convert.call(&[Value::Number(1.0)], &eval_ctx());
        assert!(err.as_error().unwrap().is_code(codes::ARG_COUNT));
    }

    #[test]
    fn test_convert_non_numeric_values() {
        for value in [Value::Bool(true), Value::Null, Value::List(vec![Value::Number(1.0)])] {
            let mut args = vec![value];
            args.extend(texts(&["length", "meters", "feet"]));
            let err = Convert.call(&args, &eval_ctx());
            assert!(err.as_error().unwrap().is_code(codes::INVALID_INPUT), "{:?}", err);
        }
    }

    #[test]
    fn test_format_units_uses_context_precision() {
        let mut args = vec![Value::Number(5.0)];
        args.extend(texts(&["length", "km", "mi"]));
        let result = FormatUnits.call(&args, &eval_ctx());
        assert_eq!(result.as_text(), Some("3.106856"));

        let result = FormatUnits.call(&args, &eval_ctx().with_precision(1));
        assert_eq!(result.as_text(), Some("3.1"));
    }

    #[test]
    fn test_format_units_decimals_argument() {
        let mut args = vec![Value::Number(5.0)];
        args.extend(texts(&["length", "km", "mi"]));
        args.push(Value::Number(2.0));
        let result = FormatUnits.call(&args, &eval_ctx());
        assert_eq!(result.as_text(), Some("3.11"));

        // Clamped to 15 digits, no float noise past that
        let mut args = vec![Value::Number(0.1 + 0.2)];
        args.extend(texts(&["length", "m", "m"]));
        args.push(Value::Number(40.0));
        let result = FormatUnits.call(&args, &eval_ctx());
        assert_eq!(result.as_text(), Some("0.3"));

        let mut args = vec![Value::Number(5.0)];
        args.extend(texts(&["length", "km", "mi"]));
        args.push(Value::Number(-1.0));
        let err = FormatUnits.call(&args, &eval_ctx());
        assert!(err.as_error().unwrap().is_code(codes::ARG_TYPE));
    }

    #[test]
    fn test_list_categories() {
        let result = ListCategories.call(&[], &eval_ctx());
        let list = result.as_list().unwrap();
        assert_eq!(list.len(), 8);
        assert_eq!(list[0].get("id"), Value::from("length"));
        assert_eq!(list[3].get("kind"), Value::from("affine"));
    }

    #[test]
    fn test_list_units() {
        let result = ListUnits.call(&texts(&["temp"]), &eval_ctx());
        let units = result.as_list().unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[2].get("id"), Value::from("kelvin"));
        assert_eq!(units[0].get("base"), Value::Bool(true));
    }

    #[test]
    fn test_default_units() {
        let result = DefaultUnits.call(&texts(&["data storage"]), &eval_ctx());
        assert_eq!(result.get("from"), Value::from("bytes"));
        assert_eq!(result.get("to"), Value::from("bits"));
    }
}
