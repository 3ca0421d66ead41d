//! Argument extraction shared by the unit functions

use proconv_core::{ProError, Value};

use crate::Category;

/// Extract a Number from a Value, returning error context
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, ProError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Error(e) => Err(e.clone()),
        other => Err(ProError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a Text string from a Value
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, ProError> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        other => Err(ProError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract and parse a category name
pub fn extract_category(value: &Value, func: &str, arg: &str) -> Result<Category, ProError> {
    let name = extract_text(value, func, arg)?;
    name.parse::<Category>().map_err(ProError::from)
}

/// Extract optional Number (may be missing or null)
pub fn extract_optional_number(args: &[Value], index: usize) -> Option<f64> {
    args.get(index).and_then(|v| v.as_number())
}

/// Fail with ARG_COUNT unless at least `expected` arguments were given
pub fn require_args(args: &[Value], func: &str, expected: usize) -> Result<(), ProError> {
    if args.len() < expected {
        return Err(ProError::arg_count(func, expected, args.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proconv_core::codes;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&Value::Number(4.5), "f", "x").unwrap(), 4.5);
        let err = extract_number(&Value::from("4.5"), "f", "x").unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_extract_passes_errors_through() {
        let upstream = ProError::not_found("thing");
        let err = extract_text(&Value::Error(upstream.clone()), "f", "x").unwrap_err();
        assert_eq!(err, upstream);
    }

    #[test]
    fn test_extract_category() {
        assert_eq!(extract_category(&Value::from("speed"), "f", "c").unwrap(), Category::Speed);
        let err = extract_category(&Value::from("Mass"), "f", "c").unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_CATEGORY);
        assert!(err.suggestion.unwrap().contains("Weight"));
    }

    #[test]
    fn test_require_args() {
        assert!(require_args(&[Value::Null], "f", 1).is_ok());
        assert_eq!(require_args(&[], "f", 2).unwrap_err().code, codes::ARG_COUNT);
    }

    #[test]
    fn test_extract_optional_number() {
        let args = [Value::Null, Value::Number(2.0)];
        assert_eq!(extract_optional_number(&args, 0), None);
        assert_eq!(extract_optional_number(&args, 1), Some(2.0));
        assert_eq!(extract_optional_number(&args, 5), None);
    }
}
