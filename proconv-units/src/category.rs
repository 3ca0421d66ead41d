//! Measurement categories

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::ConversionError;

/// One of the nine fixed measurement domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Area,
    Volume,
    Speed,
    Time,
    Energy,
    Pressure,
}

impl Category {
    /// All categories, in selector order
    pub const ALL: [Category; 9] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Area,
        Category::Volume,
        Category::Speed,
        Category::Time,
        Category::Energy,
        Category::Pressure,
    ];

    /// Display name (e.g. "Length")
    pub fn name(&self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Weight => "Weight",
            Category::Temperature => "Temperature",
            Category::Area => "Area",
            Category::Volume => "Volume",
            Category::Speed => "Speed",
            Category::Time => "Time",
            Category::Energy => "Energy",
            Category::Pressure => "Pressure",
        }
    }

    /// Temperature is the only category converted by affine formulas
    pub fn is_linear(&self) -> bool {
        !matches!(self, Category::Temperature)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConversionError::UnknownCategory(s.to_string()))
    }
}

/// Category names in selector order
pub fn categories() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_and_lowercase() {
        assert_eq!("Length".parse::<Category>().unwrap(), Category::Length);
        assert_eq!("pressure".parse::<Category>().unwrap(), Category::Pressure);
        assert_eq!(" TIME ".parse::<Category>().unwrap(), Category::Time);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "Luminosity".parse::<Category>().unwrap_err();
        assert_eq!(err, ConversionError::UnknownCategory("Luminosity".to_string()));
    }

    #[test]
    fn test_display_round_trips() {
        for c in Category::ALL {
            assert_eq!(c.to_string().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn test_selector_order() {
        assert_eq!(categories(), vec![
            "Length", "Weight", "Temperature", "Area", "Volume",
            "Speed", "Time", "Energy", "Pressure",
        ]);
    }

    #[test]
    fn test_only_temperature_is_affine() {
        let affine: Vec<_> = Category::ALL.iter().filter(|c| !c.is_linear()).collect();
        assert_eq!(affine, vec![&Category::Temperature]);
    }
}
