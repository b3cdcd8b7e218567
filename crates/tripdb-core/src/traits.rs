// crates/tripdb-core/src/traits.rs
use crate::error::Result;
use crate::filter::{AttractionFilter, CityFilter, DestinationFilter, DestinationSearch};
use crate::model::{Attraction, City, Destination};

/// The filter/search contract shared by every backend.
///
/// [`crate::Catalog`] answers from memory, [`crate::sql::SqlStore`] (feature
/// `sqlite`) answers with parameterized SQL. For the same data and the same
/// options both return the same records; the conformance suite in `tests/`
/// holds them to that.
///
/// Ordering is backend-specific: the catalog keeps insertion order, the SQL
/// store orders by name and caps every result at
/// [`crate::sql::PAGE_SIZE`] rows. The two listing helpers are sorted
/// ascending by both.
///
/// # Example
///
/// ```rust
/// use tripdb_core::{Catalog, CityFilter, TravelStore};
///
/// fn cheap_cities<S: TravelStore>(store: &S) -> tripdb_core::Result<Vec<String>> {
///     let cities = store.cities(&CityFilter::new().max_cost(80.0))?;
///     Ok(cities.into_iter().map(|c| c.name).collect())
/// }
///
/// let catalog = Catalog::empty();
/// assert!(cheap_cities(&catalog).unwrap().is_empty());
/// ```
pub trait TravelStore {
    /// Cities matching every option in `filter`.
    fn cities(&self, filter: &CityFilter) -> Result<Vec<City>>;

    /// Attractions matching every option in `filter`.
    fn attractions(&self, filter: &AttractionFilter) -> Result<Vec<Attraction>>;

    /// Destinations matching every option in `filter`.
    fn destinations(&self, filter: &DestinationFilter) -> Result<Vec<Destination>>;

    /// Cities whose name, country or description contains `query`.
    fn search_cities(&self, query: &str) -> Result<Vec<City>>;

    /// Attractions whose city name equals `city_name`, ignoring case.
    /// Exact, not substring: `"Par"` does not find Paris.
    fn attractions_by_city(&self, city_name: &str) -> Result<Vec<Attraction>>;

    /// Cities matching a destination search.
    fn search_destinations(&self, search: &DestinationSearch) -> Result<Vec<City>>;

    /// Distinct country names of all cities, ascending.
    fn countries(&self) -> Result<Vec<String>>;

    /// Distinct attraction categories as stored, ascending.
    fn attraction_categories(&self) -> Result<Vec<String>>;
}
