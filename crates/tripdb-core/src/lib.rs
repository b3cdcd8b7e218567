// crates/tripdb-core/src/lib.rs

//! # tripdb-core
//!
//! Travel catalog data access: cities, attractions and destinations loaded
//! from CSV into an in-memory [`Catalog`], or stored relationally behind
//! [`sql::SqlStore`] (feature `sqlite`). Both answer the same
//! [`TravelStore`] filter contract.
//!
//! ```rust
//! use tripdb_core::prelude::*;
//!
//! let cities = "name,country_name,latitude,longitude,population,average_cost_per_day,description,image_url\n\
//!               Kyoto,Japan,35.01,135.77,1475000,110,Temples,\n";
//! let attractions = "name,city_name,category,description,latitude,longitude,average_visit_duration,average_cost,rating,image_url,website_url\n";
//! let destinations = "name,country_name,latitude,longitude,population,average_cost_per_day,description\n";
//!
//! let (catalog, summary) =
//!     Catalog::from_readers(cities.as_bytes(), attractions.as_bytes(), destinations.as_bytes())?;
//! assert_eq!(summary.cities, 1);
//! assert_eq!(catalog.search_cities("japan").len(), 1);
//! # Ok::<(), tripdb_core::Error>(())
//! ```

pub mod api; // JSON views and endpoint entry points
pub mod catalog;
pub mod common;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod parser;
#[cfg(feature = "sqlite")]
pub mod sql;
pub mod text;
pub mod traits;
#[cfg(feature = "sqlite")]
pub mod trips;

// Re-exports
pub use crate::catalog::{Catalog, CatalogHandle};
pub use crate::common::CatalogStats;
pub use crate::error::{Error, Result};
pub use crate::filter::{AttractionFilter, CityFilter, DestinationFilter, DestinationSearch};
pub use crate::loader::LoadSummary;
pub use crate::model::{Attraction, City, Destination, Numeric};
pub use crate::traits::TravelStore;

#[cfg(feature = "sqlite")]
pub use crate::sql::{SqlStore, PAGE_SIZE};

pub mod prelude {
    pub use crate::api::{AttractionView, CityView, DestinationView};
    pub use crate::{
        Attraction, AttractionFilter, Catalog, CatalogHandle, City, CityFilter, Destination,
        DestinationFilter, DestinationSearch, Numeric, TravelStore,
    };

    #[cfg(feature = "sqlite")]
    pub use crate::sql::SqlStore;
}
