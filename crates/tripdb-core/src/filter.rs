// crates/tripdb-core/src/filter.rs

//! # Filter options
//!
//! One set of option types drives both backends. Each filter exposes its
//! normalized terms (`*_term()` accessors) and an in-memory `matches`
//! predicate; the SQL builder reads the same accessors, so a blank text
//! filter or an absent threshold is dropped the same way everywhere.
//!
//! | option                     | kind                          |
//! |----------------------------|-------------------------------|
//! | `country`, `city`, `q`     | substring, case-insensitive   |
//! | `category`                 | exact, case-insensitive       |
//! | `max_cost`, `budget_max`   | `value <= bound`              |
//! | `min_population`, `min_rating`, `budget_min` | `value >= bound` |
//!
//! Options compose with AND. An empty filter keeps everything.

use crate::error::{Error, Result};
use crate::model::{Attraction, City, Destination};
use crate::text::{contains_folded, equals_folded, non_blank};
use serde::{Deserialize, Serialize};

/// Options for [`crate::TravelStore::cities`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CityFilter {
    pub country: Option<String>,
    pub max_cost: Option<f64>,
    pub min_population: Option<u64>,
}

impl CityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    pub fn min_population(mut self, min_population: u64) -> Self {
        self.min_population = Some(min_population);
        self
    }

    pub fn country_term(&self) -> Option<&str> {
        non_blank(self.country.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.country_term().is_none() && self.max_cost.is_none() && self.min_population.is_none()
    }

    pub fn matches(&self, city: &City) -> bool {
        if let Some(country) = self.country_term() {
            if !contains_folded(&city.country_name, country) {
                return false;
            }
        }
        if let Some(max) = self.max_cost {
            if !city.average_cost_per_day.satisfies(|v| v <= max) {
                return false;
            }
        }
        if let Some(min) = self.min_population {
            if !city.population.satisfies(|v| v >= min) {
                return false;
            }
        }
        true
    }
}

/// Options for [`crate::TravelStore::attractions`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttractionFilter {
    pub city: Option<String>,
    pub category: Option<String>,
    pub max_cost: Option<f64>,
    pub min_rating: Option<f64>,
}

impl AttractionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn city_term(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }

    pub fn category_term(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.city_term().is_none()
            && self.category_term().is_none()
            && self.max_cost.is_none()
            && self.min_rating.is_none()
    }

    pub fn matches(&self, attraction: &Attraction) -> bool {
        if let Some(city) = self.city_term() {
            if !contains_folded(&attraction.city_name, city) {
                return false;
            }
        }
        if let Some(category) = self.category_term() {
            if !equals_folded(&attraction.category, category) {
                return false;
            }
        }
        if let Some(max) = self.max_cost {
            if !attraction.average_cost.satisfies(|v| v <= max) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if !attraction.rating.satisfies(|v| v >= min) {
                return false;
            }
        }
        true
    }
}

/// Options for [`crate::TravelStore::destinations`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationFilter {
    pub country: Option<String>,
    pub max_cost: Option<f64>,
}

impl DestinationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    pub fn country_term(&self) -> Option<&str> {
        non_blank(self.country.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.country_term().is_none() && self.max_cost.is_none()
    }

    pub fn matches(&self, destination: &Destination) -> bool {
        if let Some(country) = self.country_term() {
            if !contains_folded(&destination.country_name, country) {
                return false;
            }
        }
        if let Some(max) = self.max_cost {
            if !destination.average_cost_per_day.satisfies(|v| v <= max) {
                return false;
            }
        }
        true
    }
}

/// The destination search behind `GET /destinations/search`.
///
/// `q` matches city name or country name. Inverted budget bounds are not
/// special-cased: they simply match nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationSearch {
    pub q: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub category: Option<String>,
}

impl DestinationSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn budget(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.budget_min = min;
        self.budget_max = max;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn query_term(&self) -> Option<&str> {
        non_blank(self.q.as_deref())
    }

    pub fn category_term(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Builds a search from raw query-string values.
    ///
    /// Blank values are treated as absent. A budget bound that is not a
    /// finite number is rejected as a client error; nothing is queried.
    pub fn from_raw(
        q: Option<&str>,
        budget_min: Option<&str>,
        budget_max: Option<&str>,
        category: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            q: non_blank(q).map(str::to_string),
            budget_min: parse_bound("budget_min", budget_min)?,
            budget_max: parse_bound("budget_max", budget_max)?,
            category: non_blank(category).map(str::to_string),
        })
    }

    /// Matches a city, given whether it has an attraction in the requested
    /// category. `has_category` is only called when a category is set.
    pub fn matches(&self, city: &City, has_category: impl FnOnce(&str) -> bool) -> bool {
        if let Some(q) = self.query_term() {
            if !contains_folded(&city.name, q) && !contains_folded(&city.country_name, q) {
                return false;
            }
        }
        if let Some(min) = self.budget_min {
            if !city.average_cost_per_day.satisfies(|v| v >= min) {
                return false;
            }
        }
        if let Some(max) = self.budget_max {
            if !city.average_cost_per_day.satisfies(|v| v <= max) {
                return false;
            }
        }
        if let Some(category) = self.category_term() {
            if !has_category(category) {
                return false;
            }
        }
        true
    }
}

/// Matches a city against a free-text query over name, country and
/// description. Any one field matching is enough.
pub fn city_matches_query(city: &City, query: &str) -> bool {
    contains_folded(&city.name, query)
        || contains_folded(&city.country_name, query)
        || contains_folded(&city.description, query)
}

/// Parses an optional numeric filter given as text.
pub fn parse_bound(field: &'static str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(Error::invalid_filter(field, raw, "not a finite number")),
        Err(_) => Err(Error::invalid_filter(field, raw, "not a number")),
    }
}
