//! Unit conversion functions exposed through the plugin registry

use std::collections::BTreeMap;

use proconv_plugin::prelude::*;

use crate::engine::{convert, format_value, ConversionRequest, ConversionResult, MAX_DECIMALS};
use crate::helpers::{extract_category, extract_number, extract_optional_number, extract_text, require_args};
use crate::query::parse_query;
use crate::{categories, units_for};

fn result_to_value(result: Result<Value, ProError>) -> Value {
    result.unwrap_or_else(Value::Error)
}

fn request_from_args(func: &str, args: &[Value]) -> Result<ConversionRequest, ProError> {
    require_args(args, func, 4)?;
    let value = extract_number(&args[0], func, "value")?;
    let category = extract_category(&args[1], func, "category")?;
    let from = extract_text(&args[2], func, "from_unit")?;
    let to = extract_text(&args[3], func, "to_unit")?;
    Ok(ConversionRequest::new(category, from, to, value))
}

fn result_object(result: &ConversionResult, decimals: usize) -> Value {
    let mut obj = BTreeMap::new();
    obj.insert("value".to_string(), Value::Number(result.value));
    obj.insert("unit".to_string(), Value::Text(result.unit.clone()));
    obj.insert("display".to_string(), Value::Text(result.display_with(decimals)));
    Value::Object(obj)
}

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("category", "Text", "Category, e.g. \"Length\""),
    ArgMeta::required("from_unit", "Text", "Source unit, e.g. \"meters\""),
    ArgMeta::required("to_unit", "Text", "Target unit, e.g. \"feet\""),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(1, \"Length\", \"meters\", \"feet\") → 3.281",
    "convert(10, \"Weight\", \"kilograms\", \"grams\") → 10000",
    "convert(0, \"Temperature\", \"celsius\", \"fahrenheit\") → 32",
];

static CONVERT_RELATED: [&str; 3] = ["convert_query", "format_conversion", "list_units"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert a value between two units of the same category",
            usage: "convert(value, category, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Number",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        result_to_value(run_convert(args))
    }
}

fn run_convert(args: &[Value]) -> Result<Value, ProError> {
    let request = request_from_args("convert", args)?;
    let result = convert(&request)?;
    Ok(Value::Number(result.value))
}

// ============ convert_query ============

pub struct ConvertQuery;

static CONVERT_QUERY_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("query", "Text", "Query like \"10 kilograms to grams\""),
];

static CONVERT_QUERY_EXAMPLES: [&str; 2] = [
    "convert_query(\"10 kilograms to grams\") → {value: 10000, unit: \"grams\", display: \"10000.0000 grams\"}",
    "convert_query(\"212 fahrenheit -> celsius\") → {value: 100, unit: \"celsius\", display: \"100.0000 celsius\"}",
];

static CONVERT_QUERY_RELATED: [&str; 1] = ["convert"];

impl FunctionPlugin for ConvertQuery {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_query",
            description: "Parse and run a free-form conversion query; the category is inferred from the units",
            usage: "convert_query(query)",
            args: &CONVERT_QUERY_ARGS,
            returns: "Object {value: Number, unit: Text, display: Text}",
            examples: &CONVERT_QUERY_EXAMPLES,
            category: "units",
            related: &CONVERT_QUERY_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(ProError::arg_count("convert_query", 1, 0));
        }

        let text = match extract_text(&args[0], "convert_query", "query") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        let request = match parse_query(text).and_then(|q| q.into_request()) {
            Ok(r) => r,
            Err(e) => return Value::Error(e.into()),
        };

        match convert(&request) {
            Ok(result) => result_object(&result, ctx.decimals),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============ format_conversion ============

pub struct FormatConversion;

static FORMAT_ARGS: [ArgMeta; 5] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("category", "Text", "Category, e.g. \"Speed\""),
    ArgMeta::required("from_unit", "Text", "Source unit"),
    ArgMeta::required("to_unit", "Text", "Target unit"),
    ArgMeta::optional("decimals", "Number", "Decimal places in the output", "4"),
];

static FORMAT_EXAMPLES: [&str; 2] = [
    "format_conversion(1, \"Length\", \"meters\", \"feet\") → \"3.2810 feet\"",
    "format_conversion(1, \"Speed\", \"m/s\", \"knots\", 1) → \"1.9 knots\"",
];

static FORMAT_RELATED: [&str; 1] = ["convert"];

impl FunctionPlugin for FormatConversion {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_conversion",
            description: "Convert a value and render it with its unit label",
            usage: "format_conversion(value, category, from_unit, to_unit, [decimals])",
            args: &FORMAT_ARGS,
            returns: "Text",
            examples: &FORMAT_EXAMPLES,
            category: "units",
            related: &FORMAT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        result_to_value(run_format(args, ctx))
    }
}

fn run_format(args: &[Value], ctx: &EvalContext) -> Result<Value, ProError> {
    let request = request_from_args("format_conversion", args)?;
    let decimals = match extract_optional_number(args, 4) {
        Some(d) if d >= 0.0 && d.fract() == 0.0 => (d as usize).min(MAX_DECIMALS),
        Some(d) => {
            return Err(ProError::arg_type(
                "format_conversion",
                "decimals",
                "non-negative integer",
                &d.to_string(),
            ))
        }
        None => ctx.decimals,
    };
    let result = convert(&request)?;
    Ok(Value::Text(format_value(result.value, &result.unit, decimals)))
}

// ============ list_categories ============

pub struct ListCategories;

static LIST_CATEGORIES_EXAMPLES: [&str; 1] = [
    "list_categories() → [\"Length\", \"Weight\", \"Temperature\", ...]",
];

static LIST_CATEGORIES_RELATED: [&str; 1] = ["list_units"];

impl FunctionPlugin for ListCategories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_categories",
            description: "List the supported measurement categories",
            usage: "list_categories()",
            args: &[],
            returns: "List",
            examples: &LIST_CATEGORIES_EXAMPLES,
            category: "units",
            related: &LIST_CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        categories().into()
    }
}

// ============ list_units ============

pub struct ListUnits;

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "Text", "Category, e.g. \"Volume\""),
];

static LIST_UNITS_EXAMPLES: [&str; 2] = [
    "list_units(\"Speed\") → [\"m/s\", \"km/h\", \"mph\", \"knots\"]",
    "list_units(\"Temperature\") → [\"celsius\", \"fahrenheit\", \"kelvin\"]",
];

static LIST_UNITS_RELATED: [&str; 2] = ["list_categories", "convert"];

impl FunctionPlugin for ListUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_units",
            description: "List the units valid for a category, in a stable order",
            usage: "list_units(category)",
            args: &LIST_UNITS_ARGS,
            returns: "List",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &LIST_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(ProError::arg_count("list_units", 1, 0));
        }

        match extract_category(&args[0], "list_units", "category") {
            Ok(category) => units_for(category).into(),
            Err(e) => Value::Error(e),
        }
    }
}
