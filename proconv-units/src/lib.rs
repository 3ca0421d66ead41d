//! ProConverter Units - fixed unit tables and the conversion engine
//!
//! Nine categories are supported:
//! - Length (meters, kilometers, centimeters, inches, feet, miles)
//! - Weight (grams, kilograms, pounds, ounces)
//! - Temperature (celsius, fahrenheit, kelvin)
//! - Area (square_meters, square_kilometers, square_feet, acres)
//! - Volume (liters, milliliters, gallons, cubic_feet)
//! - Speed (m/s, km/h, mph, knots)
//! - Time (seconds, minutes, hours, days)
//! - Energy (joules, kilojoules, calories, kWh)
//! - Pressure (pascals, bar, psi, atm)
//!
//! Every category except Temperature converts through a scale table.
//! Temperature uses fixed affine formulas per pair of scales.

mod category;
mod engine;
mod error;
mod functions;
mod helpers;
mod query;
mod table;
mod temperature;

pub use category::{categories, Category};
pub use engine::{
    convert, convert_linear, convert_temperature, format_value,
    ConversionRequest, ConversionResult, DEFAULT_DECIMALS, MAX_DECIMALS,
};
pub use error::ConversionError;
pub use query::{parse_query, ConversionQuery};
pub use table::{category_of, scale_factor, table_for, units_for, UnitTable};
pub use temperature::TemperatureScale;

use proconv_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversion (3 functions)
        .with_function(functions::Convert)
        .with_function(functions::ConvertQuery)
        .with_function(functions::FormatConversion)

        // Inspection (2 functions)
        .with_function(functions::ListCategories)
        .with_function(functions::ListUnits)
}

/// Registry holding every unit function
pub fn standard_registry() -> PluginRegistry {
    load_units_library(PluginRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proconv_core::Value;
    use proconv_plugin::EvalContext;

    #[test]
    fn test_load_units_library() {
        let registry = standard_registry();

        assert!(registry.get_function("convert").is_some());
        assert!(registry.get_function("convert_query").is_some());
        assert!(registry.get_function("format_conversion").is_some());
        assert!(registry.get_function("list_categories").is_some());
        assert!(registry.get_function("list_units").is_some());
    }

    #[test]
    fn test_call_through_registry() {
        let registry = standard_registry();
        let args = vec![
            Value::Number(1.0),
            Value::from("Speed"),
            Value::from("m/s"),
            Value::from("knots"),
        ];
        let result = registry.call_function("convert", &args, &EvalContext::new());
        assert_eq!(result.as_number(), Some(1.944));
    }

    #[test]
    fn test_units_for_every_category_nonempty() {
        for category in Category::ALL {
            assert!(!units_for(category).is_empty(), "{} has no units", category);
        }
    }
}
