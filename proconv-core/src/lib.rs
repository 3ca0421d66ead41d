//! ProConverter Core - Fundamental types
//!
//! This crate provides the core types shared by the converter crates:
//! - `Value`: Runtime values (numbers, text, lists, objects, errors)
//! - `ProError`: Structured errors with stable machine-readable codes

mod value;
mod error;

pub use value::Value;
pub use error::{ProError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, ProError};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod value_tests {
        use super::*;

        #[test]
        fn test_from_f64() {
            let v: Value = 42.5.into();
            assert_eq!(v.as_number(), Some(42.5));
        }

        #[test]
        fn test_from_str() {
            let v: Value = "hello".into();
            assert!(matches!(v, Value::Text(_)));
            assert_eq!(v.as_text(), Some("hello"));
        }

        #[test]
        fn test_from_vec() {
            let v: Value = vec!["meters", "feet"].into();
            let items = v.as_list().unwrap();
            assert_eq!(items.len(), 2);
            assert_eq!(items[1].as_text(), Some("feet"));
        }

        #[test]
        fn test_type_name() {
            assert_eq!(Value::Number(0.0).type_name(), "Number");
            assert_eq!(Value::Text(String::new()).type_name(), "Text");
            assert_eq!(Value::Bool(true).type_name(), "Bool");
            assert_eq!(Value::Null.type_name(), "Null");
        }

        #[test]
        fn test_is_error() {
            let err = Value::Error(ProError::not_found("nope"));
            assert!(err.is_error());
            assert!(!Value::Null.is_error());
        }

        #[test]
        fn test_to_number_from_text() {
            assert_eq!(Value::Text(" 2.5 ".to_string()).to_number(), Value::Number(2.5));

            let bad = Value::Text("abc".to_string()).to_number();
            assert_eq!(bad.as_error().unwrap().code, codes::PARSE_ERROR);

            let wrong = Value::Bool(true).to_number();
            assert_eq!(wrong.as_error().unwrap().code, codes::TYPE_ERROR);
        }

        #[test]
        fn test_get_field() {
            let mut map = std::collections::BTreeMap::new();
            map.insert("unit".to_string(), Value::from("feet"));
            let obj = Value::Object(map);

            assert_eq!(obj.get("unit").as_text(), Some("feet"));
            assert_eq!(obj.get("value").as_error().unwrap().code, codes::UNDEFINED_FIELD);
            assert_eq!(Value::Null.get("unit").as_error().unwrap().code, codes::TYPE_ERROR);
        }

        #[test]
        fn test_display() {
            let v: Value = vec![1.5, 2.0].into();
            assert_eq!(v.to_string(), "[1.5, 2]");
            assert_eq!(Value::Error(ProError::not_found("x")).to_string(), "#ERROR: NOT_FOUND");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_error_construction() {
            let err = ProError::arg_count("convert", 4, 1);
            assert_eq!(err.code, codes::ARG_COUNT);
            assert_eq!(err.message, "convert() expects 4 arguments, got 1");
            assert!(err.suggestion.is_some());
        }

        #[test]
        fn test_error_display() {
            let err = ProError::parse_error("unexpected token");
            let display = format!("{}", err);
            assert!(display.contains("PARSE_ERROR"));
            assert!(display.contains("suggestion"));
        }

        #[test]
        fn test_error_display_without_suggestion() {
            let err = ProError::undefined_field("unit");
            assert_eq!(err.to_string(), "[UNDEFINED_FIELD] Undefined field: unit");
        }

        #[test]
        fn test_error_serializes_without_empty_suggestion() {
            let err = ProError::new(codes::UNKNOWN_SCALE, "Unknown temperature scale: rankine");
            let json = serde_json::to_value(&err).unwrap();
            assert_eq!(json["code"], "UNKNOWN_SCALE");
            assert_eq!(json["message"], "Unknown temperature scale: rankine");
            assert!(json.get("suggestion").is_none());
        }
    }
}
