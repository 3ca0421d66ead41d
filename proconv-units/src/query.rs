//! Free-form conversion queries
//!
//! Parses text like `"10 kilograms to grams"` or `"0 celsius -> kelvin"`
//! and infers the category from the unit names.

use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ConversionRequest;
use crate::table::category_of;
use crate::{Category, ConversionError};

#[derive(Parser)]
#[grammar = "query.pest"]
struct QueryParser;

/// A parsed query, before category inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionQuery {
    pub value: f64,
    pub from: String,
    pub to: String,
}

impl ConversionQuery {
    /// Resolve both units to a shared category and build a request
    pub fn into_request(self) -> Result<ConversionRequest, ConversionError> {
        let from_category = lookup(&self.from)?;
        let to_category = lookup(&self.to)?;

        if from_category != to_category {
            return Err(ConversionError::CategoryMismatch {
                from: self.from,
                from_category,
                to: self.to,
                to_category,
            });
        }

        Ok(ConversionRequest::new(from_category, self.from, self.to, self.value))
    }
}

fn lookup(unit: &str) -> Result<Category, ConversionError> {
    category_of(unit).ok_or_else(|| ConversionError::UnknownUnit {
        category: nearest_category(unit),
        unit: unit.to_string(),
    })
}

/// Best-effort guess of the category a misspelled unit was meant for,
/// so the error can list the right alternatives
fn nearest_category(unit: &str) -> Category {
    let lower = unit.to_lowercase();
    Category::ALL
        .iter()
        .copied()
        .max_by_key(|c| {
            crate::units_for(*c)
                .iter()
                .map(|name| common_prefix(&lower, &name.to_lowercase()))
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(Category::Length)
}

fn common_prefix(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Parse a query string
///
/// The leading number is optional and defaults to 1. Separators are `to`,
/// `in`, `->` and `=>`.
pub fn parse_query(input: &str) -> Result<ConversionQuery, ConversionError> {
    let trimmed = input.trim();
    let mut pairs = QueryParser::parse(Rule::query, trimmed).map_err(|e| {
        debug!(error = %e, "query grammar rejected input");
        ConversionError::Parse(format!("could not parse '{}'", trimmed))
    })?;

    let query = pairs
        .next()
        .ok_or_else(|| ConversionError::Parse(format!("empty query '{}'", trimmed)))?;

    let mut value = 1.0;
    let mut units = Vec::with_capacity(2);
    for pair in query.into_inner() {
        match pair.as_rule() {
            Rule::number => {
                value = pair
                    .as_str()
                    .parse::<f64>()
                    .map_err(|_| ConversionError::Parse(format!("bad number '{}'", pair.as_str())))?;
            }
            Rule::unit => units.push(pair.as_str().to_string()),
            _ => {}
        }
    }

    match <[String; 2]>::try_from(units) {
        Ok([from, to]) => Ok(ConversionQuery { value, from, to }),
        Err(_) => Err(ConversionError::Parse(format!("expected two units in '{}'", trimmed))),
    }
}
