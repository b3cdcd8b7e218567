// crates/tripdb-core/src/model.rs
use crate::text::NameMatch;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A numeric column as read from a source.
///
/// Keeps "no data" apart from "bad data" so a malformed cell is never
/// mistaken for a real number. Threshold filters only ever match
/// [`Numeric::Value`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Numeric<T> {
    Value(T),
    /// Column absent or blank.
    Missing,
    /// Column present but not a valid value for the field; keeps the raw text.
    Invalid(String),
}

impl<T: Copy> Numeric<T> {
    /// The parsed value, if there is one.
    #[inline]
    pub fn value(&self) -> Option<T> {
        match self {
            Numeric::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// `true` only for a parsed value that passes `pred`.
    #[inline]
    pub fn satisfies(&self, pred: impl FnOnce(T) -> bool) -> bool {
        self.value().is_some_and(pred)
    }
}

impl<T> Numeric<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Numeric::Missing)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Numeric::Invalid(_))
    }

    /// Parses `raw` with `check` deciding whether a parsed value is in range.
    pub fn parse_with(raw: &str, check: impl FnOnce(&T) -> bool) -> Self
    where
        T: FromStr,
    {
        let raw = raw.trim();
        if raw.is_empty() {
            return Numeric::Missing;
        }
        match raw.parse::<T>() {
            Ok(v) if check(&v) => Numeric::Value(v),
            _ => Numeric::Invalid(raw.to_string()),
        }
    }
}

impl<T> From<Option<T>> for Numeric<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Numeric::Missing, Numeric::Value)
    }
}

impl Numeric<f64> {
    /// Any finite float (coordinates, ratings).
    pub fn parse_float(raw: &str) -> Self {
        Self::parse_with(raw, |v| v.is_finite())
    }

    /// Finite and `>= 0` (costs).
    pub fn parse_amount(raw: &str) -> Self {
        Self::parse_with(raw, |v| v.is_finite() && *v >= 0.0)
    }
}

impl Numeric<u64> {
    /// Non-negative whole number (population).
    pub fn parse_count(raw: &str) -> Self {
        Self::parse_with(raw, |_| true)
    }
}

impl Numeric<u32> {
    /// Non-negative whole number of minutes.
    pub fn parse_minutes(raw: &str) -> Self {
        Self::parse_with(raw, |_| true)
    }
}

/// A city in the catalog. Identified by `(name, country_name)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country_name: String,
    pub latitude: Numeric<f64>,
    pub longitude: Numeric<f64>,
    pub population: Numeric<u64>,
    pub average_cost_per_day: Numeric<f64>,
    pub description: String,
    pub image_url: Option<String>,
}

/// A point of interest, attached to its city by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    pub city_name: String,
    pub category: String,
    pub description: String,
    pub latitude: Numeric<f64>,
    pub longitude: Numeric<f64>,
    /// Minutes.
    pub average_visit_duration: Numeric<u32>,
    pub average_cost: Numeric<f64>,
    /// Conventionally 0-5.
    pub rating: Numeric<f64>,
    pub image_url: Option<String>,
    pub website_url: Option<String>,
}

/// Country-level aggregate used by the browse views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub country_name: String,
    pub latitude: Numeric<f64>,
    pub longitude: Numeric<f64>,
    pub population: Numeric<u64>,
    pub average_cost_per_day: Numeric<f64>,
    pub description: String,
}

impl City {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.country_name
    }

    pub fn cost_per_day(&self) -> Option<f64> {
        self.average_cost_per_day.value()
    }
}

impl Attraction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating.value()
    }
}

impl Destination {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl NameMatch for City {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for Attraction {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for Destination {
    fn name_str(&self) -> &str {
        &self.name
    }
}
