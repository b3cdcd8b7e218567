// crates/tripdb-core/src/catalog.rs

//! # In-memory catalog
//!
//! Owns the parsed cities, attractions and destinations for the lifetime of
//! a session. Every query is a pure function of the collections and the
//! filter; nothing is mutated after construction, so a `&Catalog` can be
//! shared freely between threads.

use crate::common::CatalogStats;
use crate::error::Result;
use crate::filter::{
    city_matches_query, AttractionFilter, CityFilter, DestinationFilter, DestinationSearch,
};
use crate::model::{Attraction, City, Destination};
use crate::text::{equals_folded, fold_key, non_blank};
use crate::traits::TravelStore;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::warn;

/// Read-only collections backing the client-side filters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    cities: Vec<City>,
    attractions: Vec<Attraction>,
    destinations: Vec<Destination>,
    #[serde(default)]
    dropped_attractions: usize,
}

static EMPTY: Catalog = Catalog::empty();

impl Catalog {
    /// A catalog with no records. Every query on it returns nothing.
    pub const fn empty() -> Self {
        Catalog {
            cities: Vec::new(),
            attractions: Vec::new(),
            destinations: Vec::new(),
            dropped_attractions: 0,
        }
    }

    /// Builds a catalog from parsed records.
    ///
    /// Attractions whose `city_name` names no city are dropped with a
    /// warning; the second value is how many were dropped.
    pub fn from_records(
        cities: Vec<City>,
        attractions: Vec<Attraction>,
        destinations: Vec<Destination>,
    ) -> (Self, usize) {
        let known: HashSet<&str> = cities.iter().map(|c| c.name.as_str()).collect();
        let before = attractions.len();
        let attractions: Vec<Attraction> = attractions
            .into_iter()
            .filter(|a| {
                let ok = known.contains(a.city_name.as_str());
                if !ok {
                    warn!(
                        attraction = %a.name,
                        city = %a.city_name,
                        "attraction references unknown city; skipped"
                    );
                }
                ok
            })
            .collect();
        let skipped = before - attractions.len();

        let catalog = Catalog {
            cities,
            attractions,
            destinations,
            dropped_attractions: skipped,
        };
        (catalog, skipped)
    }

    pub fn all_cities(&self) -> &[City] {
        &self.cities
    }

    pub fn all_attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    pub fn all_destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Attractions dropped by [`Catalog::from_records`] for naming an
    /// unknown city. Survives snapshots.
    pub fn dropped_attractions(&self) -> usize {
        self.dropped_attractions
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.attractions.is_empty() && self.destinations.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            countries: self.countries().len(),
            cities: self.cities.len(),
            attractions: self.attractions.len(),
            destinations: self.destinations.len(),
        }
    }

    /// Looks a city up by its identity, ignoring case on both parts.
    pub fn city(&self, name: &str, country: &str) -> Option<&City> {
        self.cities
            .iter()
            .find(|c| equals_folded(&c.name, name) && equals_folded(&c.country_name, country))
    }

    pub fn cities(&self, filter: &CityFilter) -> Vec<&City> {
        self.cities.iter().filter(|c| filter.matches(c)).collect()
    }

    pub fn attractions(&self, filter: &AttractionFilter) -> Vec<&Attraction> {
        self.attractions.iter().filter(|a| filter.matches(a)).collect()
    }

    pub fn destinations(&self, filter: &DestinationFilter) -> Vec<&Destination> {
        self.destinations
            .iter()
            .filter(|d| filter.matches(d))
            .collect()
    }

    /// Blank queries match every city; the query is trimmed first.
    pub fn search_cities(&self, query: &str) -> Vec<&City> {
        let Some(query) = non_blank(Some(query)) else {
            return self.cities.iter().collect();
        };
        self.cities
            .iter()
            .filter(|c| city_matches_query(c, query))
            .collect()
    }

    pub fn attractions_by_city(&self, city_name: &str) -> Vec<&Attraction> {
        self.attractions
            .iter()
            .filter(|a| equals_folded(&a.city_name, city_name))
            .collect()
    }

    /// Cities matching a destination search.
    ///
    /// An attraction belongs to the first city carrying its exact
    /// `city_name`, which is how the relational import binds it.
    pub fn search_destinations(&self, search: &DestinationSearch) -> Vec<&City> {
        let with_category: HashSet<usize> = match search.category_term() {
            Some(category) => {
                let folded = fold_key(category);
                let mut owner: HashMap<&str, usize> = HashMap::new();
                for (idx, city) in self.cities.iter().enumerate() {
                    owner.entry(city.name.as_str()).or_insert(idx);
                }
                self.attractions
                    .iter()
                    .filter(|a| fold_key(&a.category) == folded)
                    .filter_map(|a| owner.get(a.city_name.as_str()).copied())
                    .collect()
            }
            None => HashSet::new(),
        };

        self.cities
            .iter()
            .enumerate()
            .filter(|(idx, city)| search.matches(city, |_| with_category.contains(idx)))
            .map(|(_, city)| city)
            .collect()
    }

    /// Distinct country names, as stored, ascending.
    pub fn countries(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.cities.iter().map(|c| c.country_name.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct attraction categories, as stored, ascending.
    pub fn attraction_categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .attractions
            .iter()
            .map(|a| a.category.as_str())
            .collect();
        set.into_iter().collect()
    }
}

fn owned<T: Clone>(items: Vec<&T>) -> Vec<T> {
    items.into_iter().cloned().collect()
}

fn owned_str(items: Vec<&str>) -> Vec<String> {
    items.into_iter().map(str::to_string).collect()
}

impl TravelStore for Catalog {
    fn cities(&self, filter: &CityFilter) -> Result<Vec<City>> {
        Ok(owned(Catalog::cities(self, filter)))
    }

    fn attractions(&self, filter: &AttractionFilter) -> Result<Vec<Attraction>> {
        Ok(owned(Catalog::attractions(self, filter)))
    }

    fn destinations(&self, filter: &DestinationFilter) -> Result<Vec<Destination>> {
        Ok(owned(Catalog::destinations(self, filter)))
    }

    fn search_cities(&self, query: &str) -> Result<Vec<City>> {
        Ok(owned(Catalog::search_cities(self, query)))
    }

    fn attractions_by_city(&self, city_name: &str) -> Result<Vec<Attraction>> {
        Ok(owned(Catalog::attractions_by_city(self, city_name)))
    }

    fn search_destinations(&self, search: &DestinationSearch) -> Result<Vec<City>> {
        Ok(owned(Catalog::search_destinations(self, search)))
    }

    fn countries(&self) -> Result<Vec<String>> {
        Ok(owned_str(Catalog::countries(self)))
    }

    fn attraction_categories(&self) -> Result<Vec<String>> {
        Ok(owned_str(Catalog::attraction_categories(self)))
    }
}

/// An explicitly owned, load-once slot for a [`Catalog`].
///
/// Hand one to whatever needs the catalog instead of reaching for a global.
/// Until a load succeeds, and after a failed one, [`CatalogHandle::get`]
/// returns an empty catalog, so callers can always query.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    cell: OnceCell<Catalog>,
}

impl CatalogHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `load` unless a catalog is already present. A failed load leaves
    /// the handle empty and may be retried by the caller.
    pub fn init_with<F>(&self, load: F) -> Result<&Catalog>
    where
        F: FnOnce() -> Result<Catalog>,
    {
        self.cell.get_or_try_init(load)
    }

    /// The loaded catalog, or an empty one.
    pub fn get(&self) -> &Catalog {
        self.cell.get().unwrap_or(&EMPTY)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Releases the catalog, returning the handle to its empty state.
    pub fn take(&mut self) -> Option<Catalog> {
        self.cell.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Numeric;

    fn city(name: &str, country: &str, cost: f64, population: u64, description: &str) -> City {
        City {
            name: name.into(),
            country_name: country.into(),
            latitude: Numeric::Missing,
            longitude: Numeric::Missing,
            population: Numeric::Value(population),
            average_cost_per_day: Numeric::Value(cost),
            description: description.into(),
            image_url: None,
        }
    }

    fn attraction(name: &str, city: &str, category: &str, cost: f64, rating: f64) -> Attraction {
        Attraction {
            name: name.into(),
            city_name: city.into(),
            category: category.into(),
            description: String::new(),
            latitude: Numeric::Missing,
            longitude: Numeric::Missing,
            average_visit_duration: Numeric::Value(60),
            average_cost: Numeric::Value(cost),
            rating: Numeric::Value(rating),
            image_url: None,
            website_url: None,
        }
    }

    fn fixture() -> Catalog {
        let cities = vec![
            city("Paris", "France", 180.0, 2_148_000, "Art and cafes"),
            city("Lyon", "France", 110.0, 516_000, "Gastronomy"),
            city("Kyoto", "Japan", 120.0, 1_475_000, "Temples"),
            city("Osaka", "Japan", 100.0, 2_691_000, "Street food"),
        ];
        let attractions = vec![
            attraction("Louvre", "Paris", "Museum", 17.0, 4.7),
            attraction("Eiffel Tower", "Paris", "landmark", 26.0, 4.6),
            attraction("Fushimi Inari", "Kyoto", "Shrine", 0.0, 4.8),
            attraction("Ghost Pier", "Atlantis", "Landmark", 5.0, 3.0),
        ];
        Catalog::from_records(cities, attractions, Vec::new()).0
    }

    fn names<T: crate::text::NameMatch>(items: Vec<&T>) -> Vec<&str> {
        items.into_iter().map(|i| i.name_str()).collect()
    }

    #[test]
    fn orphan_attractions_are_dropped_and_counted() {
        let cities = vec![city("Paris", "France", 180.0, 1, "")];
        let attractions = vec![
            attraction("Louvre", "Paris", "Museum", 17.0, 4.7),
            attraction("Ghost Pier", "Atlantis", "Landmark", 5.0, 3.0),
        ];
        let (catalog, skipped) = Catalog::from_records(cities, attractions, Vec::new());
        assert_eq!(skipped, 1);
        assert_eq!(catalog.all_attractions().len(), 1);
    }

    #[test]
    fn no_filter_returns_every_city_in_order() {
        let catalog = fixture();
        assert_eq!(
            names(catalog.cities(&CityFilter::new())),
            ["Paris", "Lyon", "Kyoto", "Osaka"]
        );
    }

    #[test]
    fn filters_compose_with_and() {
        let catalog = fixture();
        let f = CityFilter::new().country("japan").max_cost(110.0);
        assert_eq!(names(catalog.cities(&f)), ["Osaka"]);
        let f = CityFilter::new().country("fr").min_population(1_000_000);
        assert_eq!(names(catalog.cities(&f)), ["Paris"]);
    }

    #[test]
    fn search_hits_country_only_matches() {
        let catalog = fixture();
        assert_eq!(names(catalog.search_cities("JAPAN")), ["Kyoto", "Osaka"]);
        assert_eq!(names(catalog.search_cities("cafe")), ["Paris"]);
        assert_eq!(catalog.search_cities("   ").len(), catalog.all_cities().len());
        assert_eq!(names(catalog.search_cities(" JAPAN ")), ["Kyoto", "Osaka"]);
    }

    #[test]
    fn attractions_by_city_is_exact() {
        let catalog = fixture();
        assert_eq!(
            catalog.attractions_by_city("Paris"),
            catalog.attractions_by_city("paris")
        );
        assert_eq!(catalog.attractions_by_city("Paris").len(), 2);
        assert!(catalog.attractions_by_city("Par").is_empty());
        assert_eq!(catalog.attractions(&AttractionFilter::new().city("Par")).len(), 2);
    }

    #[test]
    fn listing_helpers_are_distinct_and_sorted() {
        let catalog = fixture();
        assert_eq!(catalog.countries(), ["France", "Japan"]);
        assert_eq!(
            catalog.attraction_categories(),
            ["Museum", "Shrine", "landmark"]
        );
    }

    #[test]
    fn destination_search_by_category() {
        let catalog = fixture();
        let s = DestinationSearch::new().category("SHRINE");
        assert_eq!(names(catalog.search_destinations(&s)), ["Kyoto"]);
        let s = DestinationSearch::new().query("fran").budget(Some(150.0), None);
        assert_eq!(names(catalog.search_destinations(&s)), ["Paris"]);
    }

    #[test]
    fn identity_lookup_ignores_case() {
        let catalog = fixture();
        assert!(catalog.city("kyoto", "JAPAN").is_some());
        assert!(catalog.city("Kyoto", "France").is_none());
    }

    #[test]
    fn handle_is_empty_until_loaded() {
        let mut handle = CatalogHandle::new();
        assert!(!handle.is_loaded());
        assert!(handle.get().is_empty());

        let failed = handle.init_with(|| {
            Err(Error::Load {
                source_name: "cities.csv".into(),
                reason: "unreadable".into(),
            })
        });
        assert!(failed.is_err());
        assert!(handle.get().cities(&CityFilter::new()).is_empty());

        handle.init_with(|| Ok(fixture())).unwrap();
        assert_eq!(handle.get().stats().cities, 4);
        // Second init is a no-op.
        handle.init_with(|| Ok(Catalog::empty())).unwrap();
        assert_eq!(handle.get().stats().cities, 4);

        assert!(handle.take().is_some());
        assert!(!handle.is_loaded());
    }
}
