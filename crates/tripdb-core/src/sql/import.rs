// crates/tripdb-core/src/sql/import.rs
use super::SqlStore;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::Numeric;
use rusqlite::{params, OptionalExtension, Transaction};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Row counts written by [`SqlStore::import_catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub countries: usize,
    pub cities: usize,
    pub destinations: usize,
    pub attractions: usize,
    /// Attractions whose city name matched no city, whether dropped when the
    /// catalog was built or at import.
    pub skipped_attractions: usize,
}

fn nullable(v: &Numeric<f64>) -> Option<f64> {
    v.value()
}

fn nullable_count(v: &Numeric<u64>) -> Option<i64> {
    v.value().map(|n| i64::try_from(n).unwrap_or(i64::MAX))
}

/// Three-letter upper-case code derived from a country name.
fn iso_code(country: &str) -> String {
    country
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(3)
        .flat_map(char::to_uppercase)
        .collect()
}

struct Countries<'a> {
    tx: &'a Transaction<'a>,
    ids: HashMap<String, i64>,
    inserted: usize,
}

impl<'a> Countries<'a> {
    fn id(&mut self, name: &str) -> Result<i64> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let inserted = self.tx.execute(
            "INSERT INTO countries (name, iso_code, currency, timezone) VALUES (?1, ?2, 'USD', 'UTC') \
             ON CONFLICT(name) DO NOTHING",
            params![name, iso_code(name)],
        )?;
        self.inserted += inserted;
        let id: i64 =
            self.tx
                .query_row("SELECT id FROM countries WHERE name = ?1", [name], |r| r.get(0))?;
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }
}

impl SqlStore {
    /// Seeds the database from `catalog` in one transaction.
    ///
    /// Countries are created on first sight. Cities and destinations are
    /// upserted on `(name, country)`, attractions on `(city, name)`. Each
    /// attraction binds to the first stored city (lowest id) with exactly
    /// its `city_name`; attractions with no such city are skipped and
    /// counted, together with those the catalog already dropped at build.
    pub fn import_catalog(&mut self, catalog: &Catalog) -> Result<ImportReport> {
        let tx = self.connection_mut().transaction()?;
        let mut report = ImportReport {
            skipped_attractions: catalog.dropped_attractions(),
            ..ImportReport::default()
        };
        {
            let mut countries = Countries {
                tx: &tx,
                ids: HashMap::new(),
                inserted: 0,
            };

            for city in catalog.all_cities() {
                let country_id = countries.id(&city.country_name)?;
                tx.execute(
                    "INSERT INTO cities (name, country_id, latitude, longitude, population, \
                         average_cost_per_day, description, image_url) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
                     ON CONFLICT(name, country_id) DO UPDATE SET \
                         latitude = excluded.latitude, longitude = excluded.longitude, \
                         population = excluded.population, \
                         average_cost_per_day = excluded.average_cost_per_day, \
                         description = excluded.description, image_url = excluded.image_url",
                    params![
                        city.name,
                        country_id,
                        nullable(&city.latitude),
                        nullable(&city.longitude),
                        nullable_count(&city.population),
                        nullable(&city.average_cost_per_day),
                        city.description,
                        city.image_url,
                    ],
                )?;
                report.cities += 1;
            }

            for dest in catalog.all_destinations() {
                let country_id = countries.id(&dest.country_name)?;
                tx.execute(
                    "INSERT INTO destinations (name, country_id, latitude, longitude, population, \
                         average_cost_per_day, description) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
                     ON CONFLICT(name, country_id) DO UPDATE SET \
                         latitude = excluded.latitude, longitude = excluded.longitude, \
                         population = excluded.population, \
                         average_cost_per_day = excluded.average_cost_per_day, \
                         description = excluded.description",
                    params![
                        dest.name,
                        country_id,
                        nullable(&dest.latitude),
                        nullable(&dest.longitude),
                        nullable_count(&dest.population),
                        nullable(&dest.average_cost_per_day),
                        dest.description,
                    ],
                )?;
                report.destinations += 1;
            }
            report.countries = countries.inserted;

            let mut city_ids: HashMap<&str, Option<i64>> = HashMap::new();
            for attraction in catalog.all_attractions() {
                let city_id = match city_ids.get(attraction.city_name.as_str()) {
                    Some(id) => *id,
                    None => {
                        let id: Option<i64> = tx
                            .query_row(
                                "SELECT id FROM cities WHERE name = ?1 ORDER BY id LIMIT 1",
                                [&attraction.city_name],
                                |r| r.get(0),
                            )
                            .optional()?;
                        city_ids.insert(&attraction.city_name, id);
                        id
                    }
                };
                let Some(city_id) = city_id else {
                    warn!(
                        attraction = %attraction.name,
                        city = %attraction.city_name,
                        "skipping attraction with unknown city"
                    );
                    report.skipped_attractions += 1;
                    continue;
                };
                tx.execute(
                    "INSERT INTO attractions (city_id, name, category, description, latitude, \
                         longitude, average_visit_duration, average_cost, rating, image_url, website_url) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
                     ON CONFLICT(city_id, name) DO UPDATE SET \
                         category = excluded.category, description = excluded.description, \
                         latitude = excluded.latitude, longitude = excluded.longitude, \
                         average_visit_duration = excluded.average_visit_duration, \
                         average_cost = excluded.average_cost, rating = excluded.rating, \
                         image_url = excluded.image_url, website_url = excluded.website_url",
                    params![
                        city_id,
                        attraction.name,
                        attraction.category,
                        attraction.description,
                        nullable(&attraction.latitude),
                        nullable(&attraction.longitude),
                        attraction.average_visit_duration.value().map(i64::from),
                        nullable(&attraction.average_cost),
                        nullable(&attraction.rating),
                        attraction.image_url,
                        attraction.website_url,
                    ],
                )?;
                report.attractions += 1;
            }
        }
        tx.commit()?;

        info!(
            countries = report.countries,
            cities = report.cities,
            destinations = report.destinations,
            attractions = report.attractions,
            skipped_attractions = report.skipped_attractions,
            "catalog imported"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attraction, City};
    use crate::traits::TravelStore;

    fn city(name: &str, country: &str) -> City {
        City {
            name: name.into(),
            country_name: country.into(),
            latitude: Numeric::Missing,
            longitude: Numeric::Missing,
            population: Numeric::Value(10),
            average_cost_per_day: Numeric::Invalid("n/a".into()),
            description: String::new(),
            image_url: None,
        }
    }

    fn attraction(name: &str, city: &str) -> Attraction {
        Attraction {
            name: name.into(),
            city_name: city.into(),
            category: "Park".into(),
            description: String::new(),
            latitude: Numeric::Missing,
            longitude: Numeric::Missing,
            average_visit_duration: Numeric::Value(60),
            average_cost: Numeric::Value(0.0),
            rating: Numeric::Value(4.0),
            image_url: None,
            website_url: None,
        }
    }

    #[test]
    fn derives_three_letter_codes() {
        assert_eq!(iso_code("France"), "FRA");
        assert_eq!(iso_code("Côte d'Ivoire"), "CÔT");
        assert_eq!(iso_code("UK"), "UK");
    }

    #[test]
    fn duplicate_city_names_bind_to_first_city() {
        let (catalog, _) = Catalog::from_records(
            vec![city("Springfield", "Alpha"), city("Springfield", "Beta")],
            vec![attraction("Town Park", "Springfield")],
            vec![],
        );
        let mut store = SqlStore::open_in_memory().unwrap();
        let report = store.import_catalog(&catalog).unwrap();
        assert_eq!(report.countries, 2);
        assert_eq!(report.cities, 2);
        assert_eq!(report.attractions, 1);

        let rows = store.city_attractions(1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Town Park");
        assert!(store.city_attractions(2).unwrap().is_empty());
    }

    #[test]
    fn invalid_numbers_are_stored_as_null() {
        let (catalog, _) = Catalog::from_records(vec![city("Lima", "Peru")], vec![], vec![]);
        let mut store = SqlStore::open_in_memory().unwrap();
        store.import_catalog(&catalog).unwrap();
        let cities = store.cities(&Default::default()).unwrap();
        assert!(cities[0].average_cost_per_day.is_missing());
    }

    #[test]
    fn reimport_is_an_upsert() {
        let (catalog, _) = Catalog::from_records(
            vec![city("Lima", "Peru")],
            vec![attraction("Parque Kennedy", "Lima")],
            vec![],
        );
        let mut store = SqlStore::open_in_memory().unwrap();
        store.import_catalog(&catalog).unwrap();
        let second = store.import_catalog(&catalog).unwrap();
        assert_eq!(second.countries, 0);
        assert_eq!(second.attractions, 1);
        assert_eq!(store.cities(&Default::default()).unwrap().len(), 1);

        let stored = store.attractions(&Default::default()).unwrap();
        assert_eq!(stored.len(), catalog.all_attractions().len());
        assert_eq!(store.city_attractions(1).unwrap().len(), 1);
    }

    #[test]
    fn reimport_updates_attraction_in_place() {
        let (first, _) = Catalog::from_records(
            vec![city("Lima", "Peru")],
            vec![attraction("Parque Kennedy", "Lima")],
            vec![],
        );
        let mut renamed = attraction("Parque Kennedy", "Lima");
        renamed.rating = Numeric::Value(4.9);
        let (second, _) = Catalog::from_records(vec![city("Lima", "Peru")], vec![renamed], vec![]);

        let mut store = SqlStore::open_in_memory().unwrap();
        store.import_catalog(&first).unwrap();
        store.import_catalog(&second).unwrap();
        let rows = store.city_attractions(1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rating, Some(4.9));
    }

    #[test]
    fn orphans_dropped_at_build_are_reported() {
        let (catalog, dropped) = Catalog::from_records(
            vec![city("Lima", "Peru")],
            vec![
                attraction("Parque Kennedy", "Lima"),
                attraction("Ghost Pier", "Atlantis"),
            ],
            vec![],
        );
        assert_eq!(dropped, 1);
        let mut store = SqlStore::open_in_memory().unwrap();
        let report = store.import_catalog(&catalog).unwrap();
        assert_eq!(report.attractions, 1);
        assert_eq!(report.skipped_attractions, 1);
    }
}
