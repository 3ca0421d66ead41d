//! Conversion engine
//!
//! Two entry points: linear conversion through the scale tables, and
//! affine conversion between temperature scales. `convert` routes a
//! request to the right one based on its category.

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::table::scale_factor;
use crate::temperature::TemperatureScale;
use crate::{Category, ConversionError};

pub use proconv_plugin::{DEFAULT_DECIMALS, MAX_DECIMALS};

fn default_value() -> f64 {
    1.0
}

/// A single conversion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    #[serde(default = "default_value")]
    pub value: f64,
}

impl ConversionRequest {
    pub fn new(category: Category, from_unit: impl Into<String>, to_unit: impl Into<String>, value: f64) -> Self {
        Self {
            category,
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            value,
        }
    }
}

/// A converted value and the unit it is expressed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub value: f64,
    pub unit: String,
}

impl ConversionResult {
    /// Render with an explicit number of decimal places
    pub fn display_with(&self, decimals: usize) -> String {
        format_value(self.value, &self.unit, decimals)
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*} {}", DEFAULT_DECIMALS, self.value, self.unit)
    }
}

/// Format a value and unit label, e.g. `"3.2810 feet"` for 4 decimals
pub fn format_value(value: f64, unit: &str, decimals: usize) -> String {
    format!("{:.*} {}", decimals, value, unit)
}

fn ensure_finite(value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        warn!(value, "rejecting non-finite input");
        Err(ConversionError::InvalidValue(value))
    }
}

/// Convert between two units of a linear category.
///
/// `result = value * (factor(to) / factor(from))`. Converting a unit to
/// itself returns `value` bit-for-bit, since `f / f` is exactly 1.
pub fn convert_linear(value: f64, category: Category, from_unit: &str, to_unit: &str) -> Result<f64, ConversionError> {
    let value = ensure_finite(value)?;
    let from = scale_factor(category, from_unit)?;
    let to = scale_factor(category, to_unit)?;
    Ok(value * (to / from))
}

/// Convert between temperature scales named `celsius`, `fahrenheit` or `kelvin`.
///
/// Unrecognised names fail with `UnknownScale` rather than passing the
/// value through.
pub fn convert_temperature(value: f64, from_scale: &str, to_scale: &str) -> Result<f64, ConversionError> {
    let value = ensure_finite(value)?;
    let from: TemperatureScale = from_scale.parse()?;
    let to: TemperatureScale = to_scale.parse()?;
    Ok(from.convert(value, to))
}

/// Run a conversion request through the engine
pub fn convert(request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
    let value = if request.category.is_linear() {
        convert_linear(request.value, request.category, &request.from_unit, &request.to_unit)?
    } else {
        convert_temperature(request.value, &request.from_unit, &request.to_unit)?
    };

    debug!(
        category = %request.category,
        from = %request.from_unit,
        to = %request.to_unit,
        input = request.value,
        output = value,
        "converted"
    );

    Ok(ConversionResult {
        value,
        unit: request.to_unit.clone(),
    })
}
