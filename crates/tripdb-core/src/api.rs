// crates/tripdb-core/src/api.rs

//! # JSON surface
//!
//! Borrowing views that render catalog records as flat snake_case JSON
//! (degraded numbers become `null`), plus the request-shaped entry points an
//! HTTP layer calls for the destination endpoints.

use crate::model::{Attraction, City, Destination, Numeric};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

#[cfg(feature = "sqlite")]
use crate::{
    error::{Error, Result},
    filter::DestinationSearch,
    sql::SqlStore,
    traits::TravelStore,
};

#[cfg(feature = "sqlite")]
pub use crate::sql::{AttractionRow, DestinationRow};

fn num<T: Copy>(n: &Numeric<T>) -> Option<T> {
    n.value()
}

/// JSON view of a [`City`].
#[derive(Debug, Clone, Copy)]
pub struct CityView<'a>(pub &'a City);

impl Serialize for CityView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let c = self.0;
        let mut s = serializer.serialize_struct("City", 8)?;
        s.serialize_field("name", &c.name)?;
        s.serialize_field("country_name", &c.country_name)?;
        s.serialize_field("latitude", &num(&c.latitude))?;
        s.serialize_field("longitude", &num(&c.longitude))?;
        s.serialize_field("population", &num(&c.population))?;
        s.serialize_field("average_cost_per_day", &num(&c.average_cost_per_day))?;
        s.serialize_field("description", &c.description)?;
        s.serialize_field("image_url", &c.image_url)?;
        s.end()
    }
}

/// JSON view of an [`Attraction`].
#[derive(Debug, Clone, Copy)]
pub struct AttractionView<'a>(pub &'a Attraction);

impl Serialize for AttractionView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let a = self.0;
        let mut s = serializer.serialize_struct("Attraction", 11)?;
        s.serialize_field("name", &a.name)?;
        s.serialize_field("city_name", &a.city_name)?;
        s.serialize_field("category", &a.category)?;
        s.serialize_field("description", &a.description)?;
        s.serialize_field("latitude", &num(&a.latitude))?;
        s.serialize_field("longitude", &num(&a.longitude))?;
        s.serialize_field("average_visit_duration", &num(&a.average_visit_duration))?;
        s.serialize_field("average_cost", &num(&a.average_cost))?;
        s.serialize_field("rating", &num(&a.rating))?;
        s.serialize_field("image_url", &a.image_url)?;
        s.serialize_field("website_url", &a.website_url)?;
        s.end()
    }
}

/// JSON view of a [`Destination`].
#[derive(Debug, Clone, Copy)]
pub struct DestinationView<'a>(pub &'a Destination);

impl Serialize for DestinationView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let d = self.0;
        let mut s = serializer.serialize_struct("Destination", 7)?;
        s.serialize_field("name", &d.name)?;
        s.serialize_field("country_name", &d.country_name)?;
        s.serialize_field("latitude", &num(&d.latitude))?;
        s.serialize_field("longitude", &num(&d.longitude))?;
        s.serialize_field("population", &num(&d.population))?;
        s.serialize_field("average_cost_per_day", &num(&d.average_cost_per_day))?;
        s.serialize_field("description", &d.description)?;
        s.end()
    }
}

/// Raw query parameters of `GET /destinations/search`, as the HTTP layer
/// decodes them. Values are unvalidated text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub budget_min: Option<String>,
    #[serde(default)]
    pub budget_max: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[cfg(feature = "sqlite")]
impl SearchParams {
    /// Validates the raw values into a typed search.
    pub fn to_search(&self) -> Result<DestinationSearch> {
        DestinationSearch::from_raw(
            self.q.as_deref(),
            self.budget_min.as_deref(),
            self.budget_max.as_deref(),
            self.category.as_deref(),
        )
    }
}

/// An error as the HTTP layer returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    #[serde(rename = "error")]
    pub message: String,
}

impl ApiError {
    /// `{"error": "..."}`
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.message })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ApiError {}

#[cfg(feature = "sqlite")]
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match &err {
            Error::NotFound(_) => ApiError {
                status: 404,
                message: err.to_string(),
            },
            e if e.is_client_error() => ApiError {
                status: 400,
                message: err.to_string(),
            },
            _ => {
                tracing::error!(error = %err, "request failed");
                ApiError {
                    status: 500,
                    message: "internal server error".into(),
                }
            }
        }
    }
}

/// `GET /destinations`
#[cfg(feature = "sqlite")]
pub fn list_destinations(store: &SqlStore) -> std::result::Result<Vec<DestinationRow>, ApiError> {
    Ok(store.popular_destinations()?)
}

/// `GET /destinations/search`
#[cfg(feature = "sqlite")]
pub fn search_destinations(
    store: &SqlStore,
    params: &SearchParams,
) -> std::result::Result<Vec<DestinationRow>, ApiError> {
    let search = params.to_search()?;
    Ok(store.destination_rows(&search)?)
}

/// `GET /destinations/{city_id}/attractions`
#[cfg(feature = "sqlite")]
pub fn city_attractions(
    store: &SqlStore,
    city_id: &str,
) -> std::result::Result<Vec<AttractionRow>, ApiError> {
    let id: i64 = city_id
        .trim()
        .parse()
        .map_err(|_| Error::invalid_filter("city_id", city_id, "not an integer id"))?;
    Ok(store.city_attractions(id)?)
}

/// `GET /categories`
#[cfg(feature = "sqlite")]
pub fn categories(store: &SqlStore) -> std::result::Result<Vec<String>, ApiError> {
    Ok(store.attraction_categories()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lyon() -> City {
        City {
            name: "Lyon".into(),
            country_name: "France".into(),
            latitude: Numeric::Value(45.76),
            longitude: Numeric::Missing,
            population: Numeric::Value(513_000),
            average_cost_per_day: Numeric::Invalid("cheap".into()),
            description: "Food".into(),
            image_url: None,
        }
    }

    #[test]
    fn views_flatten_degraded_numbers_to_null() {
        let city = lyon();
        let json = serde_json::to_value(CityView(&city)).unwrap();
        assert_eq!(json["latitude"], 45.76);
        assert!(json["longitude"].is_null());
        assert!(json["average_cost_per_day"].is_null());
        assert_eq!(json["population"], 513_000);
    }

    #[test]
    fn error_body_shape() {
        let err = ApiError {
            status: 400,
            message: "bad".into(),
        };
        assert_eq!(err.body(), serde_json::json!({ "error": "bad" }));
        assert_eq!(serde_json::to_value(&err).unwrap(), err.body());
    }

    #[cfg(feature = "sqlite")]
    mod endpoints {
        use super::super::*;
        use crate::catalog::Catalog;

        fn store() -> SqlStore {
            let (catalog, _) = Catalog::from_records(vec![super::lyon()], vec![], vec![]);
            let mut store = SqlStore::open_in_memory().unwrap();
            store.import_catalog(&catalog).unwrap();
            store
        }

        #[test]
        fn non_numeric_budget_is_a_400() {
            let params = SearchParams {
                budget_max: Some("cheap".into()),
                ..Default::default()
            };
            let err = search_destinations(&store(), &params).unwrap_err();
            assert_eq!(err.status, 400);
            assert!(err.message.contains("budget_max"));
        }

        #[test]
        fn bad_city_id_is_a_400() {
            let err = city_attractions(&store(), "abc").unwrap_err();
            assert_eq!(err.status, 400);
        }

        #[test]
        fn unknown_city_id_is_empty() {
            assert!(city_attractions(&store(), "42").unwrap().is_empty());
        }

        #[test]
        fn not_found_is_a_404() {
            let err = ApiError::from(Error::NotFound("trip 9".into()));
            assert_eq!(err.status, 404);
        }

        fn sight(name: &str, rating: Numeric<f64>) -> Attraction {
            Attraction {
                name: name.into(),
                city_name: "Lyon".into(),
                category: "Landmark".into(),
                description: String::new(),
                latitude: Numeric::Missing,
                longitude: Numeric::Missing,
                average_visit_duration: Numeric::Missing,
                average_cost: Numeric::Missing,
                rating,
                image_url: None,
                website_url: None,
            }
        }

        #[test]
        fn city_attractions_are_best_rated_first_unrated_last() {
            let (catalog, _) = Catalog::from_records(
                vec![super::lyon()],
                vec![
                    sight("Unrated", Numeric::Missing),
                    sight("Good", Numeric::Value(4.2)),
                    sight("Best", Numeric::Value(4.8)),
                ],
                vec![],
            );
            let mut store = SqlStore::open_in_memory().unwrap();
            store.import_catalog(&catalog).unwrap();

            let rows = city_attractions(&store, "1").unwrap();
            let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, ["Best", "Good", "Unrated"]);
            assert_eq!(rows[2].rating, None);
        }

        #[test]
        fn search_rows_carry_country_code() {
            let params = SearchParams {
                q: Some("fra".into()),
                ..Default::default()
            };
            let rows = search_destinations(&store(), &params).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].city_name, "Lyon");
            assert_eq!(rows[0].iso_code.as_deref(), Some("FRA"));
            assert_eq!(rows[0].trip_count, 0);
        }
    }
}
