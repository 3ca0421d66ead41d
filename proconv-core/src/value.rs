//! Runtime values passed across the plugin boundary
//!
//! Values can be numbers, text, booleans, objects, lists, null, or errors.
//! Errors are ordinary values so a failed request never aborts its caller.

use crate::ProError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Object(BTreeMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(ProError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ProError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => map
                .get(key)
                .cloned()
                .unwrap_or_else(|| Value::Error(ProError::undefined_field(key))),
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(ProError::type_error("Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    /// Coerce to number. Text is parsed; anything else is a type error.
    pub fn to_number(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(*n),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => Value::Error(ProError::parse_error(format!("not a number: '{}'", s))),
            },
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(ProError::type_error("Number", self.type_name())),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(obj) => {
                let fields: Vec<String> = obj.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", fields.join(", "))
            }
            Value::List(items) => {
                let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", contents.join(", "))
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ProError> for Value {
    fn from(e: ProError) -> Self {
        Value::Error(e)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
