//! Unit tables - fixed scale factors for every linear category
//!
//! Each entry reads "1 base unit of the category equals `factor` of this
//! unit". The base unit always has factor 1. Factors are kept as the exact
//! literals the converter has always used, so results stay bit-identical.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::temperature::TemperatureScale;
use crate::{Category, ConversionError};

/// A category's scale table, in declaration order
#[derive(Debug, Clone, Copy)]
pub struct UnitTable {
    pub units: &'static [(&'static str, f64)],
}

impl UnitTable {
    pub fn names(&self) -> Vec<&'static str> {
        self.units.iter().map(|(name, _)| *name).collect()
    }

    pub fn factor(&self, unit: &str) -> Option<f64> {
        self.units.iter().find(|(name, _)| *name == unit).map(|(_, f)| *f)
    }
}

static LENGTH: UnitTable = UnitTable {
    units: &[
        ("meters", 1.0),
        ("kilometers", 0.001),
        ("centimeters", 100.0),
        ("inches", 39.37),
        ("feet", 3.281),
        ("miles", 0.000621),
    ],
};

static WEIGHT: UnitTable = UnitTable {
    units: &[
        ("grams", 1.0),
        ("kilograms", 0.001),
        ("pounds", 0.00220462),
        ("ounces", 0.035274),
    ],
};

static AREA: UnitTable = UnitTable {
    units: &[
        ("square_meters", 1.0),
        ("square_kilometers", 0.000001),
        ("square_feet", 10.7639),
        ("acres", 0.000247105),
    ],
};

static VOLUME: UnitTable = UnitTable {
    units: &[
        ("liters", 1.0),
        ("milliliters", 1000.0),
        ("gallons", 0.264172),
        ("cubic_feet", 0.0353147),
    ],
};

static SPEED: UnitTable = UnitTable {
    units: &[
        ("m/s", 1.0),
        ("km/h", 3.6),
        ("mph", 2.237),
        ("knots", 1.944),
    ],
};

static TIME: UnitTable = UnitTable {
    units: &[
        ("seconds", 1.0),
        ("minutes", 1.0 / 60.0),
        ("hours", 1.0 / 3600.0),
        ("days", 1.0 / 86400.0),
    ],
};

static ENERGY: UnitTable = UnitTable {
    units: &[
        ("joules", 1.0),
        ("kilojoules", 0.001),
        ("calories", 0.239),
        ("kWh", 2.7778e-7),
    ],
};

static PRESSURE: UnitTable = UnitTable {
    units: &[
        ("pascals", 1.0),
        ("bar", 1e-5),
        ("psi", 0.000145),
        ("atm", 9.8692e-6),
    ],
};

/// Scale table for a linear category; `None` for Temperature
pub fn table_for(category: Category) -> Option<&'static UnitTable> {
    match category {
        Category::Length => Some(&LENGTH),
        Category::Weight => Some(&WEIGHT),
        Category::Area => Some(&AREA),
        Category::Volume => Some(&VOLUME),
        Category::Speed => Some(&SPEED),
        Category::Time => Some(&TIME),
        Category::Energy => Some(&ENERGY),
        Category::Pressure => Some(&PRESSURE),
        Category::Temperature => None,
    }
}

/// Unit names valid for a category, in stable declaration order
pub fn units_for(category: Category) -> Vec<&'static str> {
    match table_for(category) {
        Some(table) => table.names(),
        None => TemperatureScale::ALL.iter().map(|s| s.name()).collect(),
    }
}

/// Scale factor of `unit` relative to the category's base unit
pub fn scale_factor(category: Category, unit: &str) -> Result<f64, ConversionError> {
    let table = table_for(category).ok_or(ConversionError::NotLinear(category))?;
    table.factor(unit).ok_or_else(|| ConversionError::UnknownUnit {
        category,
        unit: unit.to_string(),
    })
}

/// Reverse index from unit name to its category, built once
static UNIT_INDEX: LazyLock<HashMap<&'static str, Category>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for category in Category::ALL {
        for name in units_for(category) {
            index.insert(name, category);
        }
    }
    index
});

/// Category a unit name belongs to, if any
pub fn category_of(unit: &str) -> Option<Category> {
    UNIT_INDEX.get(unit).copied()
}
