//! Temperature scales
//!
//! Temperature scales do not share a common zero, so they cannot be
//! converted through a scale table. Each ordered pair of distinct scales
//! has its own affine formula instead.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::ConversionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub const ALL: [TemperatureScale; 3] = [
        TemperatureScale::Celsius,
        TemperatureScale::Fahrenheit,
        TemperatureScale::Kelvin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "celsius",
            TemperatureScale::Fahrenheit => "fahrenheit",
            TemperatureScale::Kelvin => "kelvin",
        }
    }

    /// Convert `value` from this scale to `target`.
    ///
    /// Same-scale conversion returns `value` unchanged.
    pub fn convert(self, value: f64, target: TemperatureScale) -> f64 {
        use TemperatureScale::*;

        match (self, target) {
            (Celsius, Fahrenheit) => value * 9.0 / 5.0 + 32.0,
            (Fahrenheit, Celsius) => (value - 32.0) * 5.0 / 9.0,
            (Celsius, Kelvin) => value + 273.15,
            (Kelvin, Celsius) => value - 273.15,
            (Fahrenheit, Kelvin) => (value - 32.0) * 5.0 / 9.0 + 273.15,
            (Kelvin, Fahrenheit) => (value - 273.15) * 9.0 / 5.0 + 32.0,
            (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => value,
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemperatureScale {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemperatureScale::ALL
            .iter()
            .copied()
            .find(|scale| scale.name() == s)
            .ok_or_else(|| ConversionError::UnknownScale(s.to_string()))
    }
}
