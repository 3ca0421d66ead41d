//! Conversion errors

use proconv_core::{codes, ProError};
use thiserror::Error;

use crate::Category;

/// Errors that can occur during unit conversion
///
/// All variants are local validation failures: they are detected before any
/// arithmetic happens and are deterministic for a given input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown unit '{unit}' for category {category}")]
    UnknownUnit { category: Category, unit: String },

    #[error("unknown temperature scale: {0}")]
    UnknownScale(String),

    #[error("invalid value: {0} is not a finite number")]
    InvalidValue(f64),

    #[error("{0} has no linear scale table")]
    NotLinear(Category),

    #[error("cannot convert {from} ({from_category}) to {to} ({to_category})")]
    CategoryMismatch {
        from: String,
        from_category: Category,
        to: String,
        to_category: Category,
    },

    #[error("invalid query: {0}")]
    Parse(String),
}

impl ConversionError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            ConversionError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            ConversionError::UnknownScale(_) => codes::UNKNOWN_SCALE,
            ConversionError::InvalidValue(_) => codes::INVALID_VALUE,
            ConversionError::NotLinear(_) => codes::NOT_LINEAR,
            ConversionError::CategoryMismatch { .. } => codes::CATEGORY_MISMATCH,
            ConversionError::Parse(_) => codes::PARSE_ERROR,
        }
    }
}

impl From<ConversionError> for ProError {
    fn from(err: ConversionError) -> Self {
        let suggestion = match &err {
            ConversionError::UnknownCategory(_) => Some(format!(
                "Valid categories: {}",
                Category::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
            )),
            ConversionError::UnknownUnit { category, .. } => Some(format!(
                "Valid {} units: {}",
                category.name(),
                crate::units_for(*category).join(", ")
            )),
            ConversionError::UnknownScale(_) => {
                Some("Valid scales: celsius, fahrenheit, kelvin".to_string())
            }
            ConversionError::NotLinear(_) => {
                Some("Use a temperature conversion for celsius, fahrenheit, kelvin".to_string())
            }
            ConversionError::Parse(_) => {
                Some("Write queries like \"10 kilograms to grams\"".to_string())
            }
            ConversionError::InvalidValue(_) | ConversionError::CategoryMismatch { .. } => None,
        };

        let pro = ProError::new(err.code(), err.to_string());
        match suggestion {
            Some(s) => pro.with_suggestion(s),
            None => pro,
        }
    }
}
