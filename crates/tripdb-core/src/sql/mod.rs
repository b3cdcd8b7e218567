// crates/tripdb-core/src/sql/mod.rs

//! # Relational Backend
//!
//! [`SqlStore`] answers the [`TravelStore`] contract from a SQLite database
//! with parameterized statements built by [`builder`]. The same builder
//! renders PostgreSQL text (`$N` placeholders, `LOWER()` folding) for
//! deployments that run the statements elsewhere.
//!
//! Case folding must agree with the in-memory catalog, so every connection
//! registers a `casefold()` scalar function backed by
//! [`crate::text::fold_key`] instead of relying on SQLite's ASCII-only
//! `LOWER()`.

use crate::error::Result;
use crate::filter::{AttractionFilter, CityFilter, DestinationFilter, DestinationSearch};
use crate::model::{Attraction, City, Destination};
use crate::text::fold_key;
use crate::traits::TravelStore;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use tracing::{debug, info};

pub mod builder;
mod import;
mod rows;
pub mod schema;

pub use builder::{BuiltQuery, Dialect, QueryBuilder, SqlValue};
pub use import::ImportReport;
pub use rows::{AttractionRow, DestinationRow};

/// Upper bound on rows returned by any SQL query.
pub const PAGE_SIZE: usize = 50;

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Text(s) => ToSqlOutput::from(s.as_str()),
            SqlValue::Real(v) => ToSqlOutput::from(*v),
            SqlValue::Integer(v) => ToSqlOutput::from(*v),
        })
    }
}

/// A SQLite-backed travel store.
pub struct SqlStore {
    conn: Connection,
}

impl std::fmt::Debug for SqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqlStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening database");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Prepares an existing connection: registers `casefold()` and applies
    /// the schema.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        register_casefold(&conn)?;
        conn.execute_batch(schema::ddl(Dialect::Sqlite))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub(crate) fn run<T, F>(&self, query: &BuiltQuery, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!(sql = %query.sql, params = query.params.len(), "query");
        let mut stmt = self.conn.prepare_cached(&query.sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(query.params.iter()), map)?;
        Ok(rows.collect::<rusqlite::Result<Vec<T>>>()?)
    }

    fn names(&self, query: &BuiltQuery) -> Result<Vec<String>> {
        self.run(query, |row| row.get(0))
    }

    /// Destination search rows: city, country, code, image and trip count.
    pub fn destination_rows(&self, search: &DestinationSearch) -> Result<Vec<DestinationRow>> {
        let query = builder::destination_rows(Dialect::Sqlite, search);
        self.run(&query, DestinationRow::from_row)
    }

    /// Cities ranked by how many trips include them, then by name.
    pub fn popular_destinations(&self) -> Result<Vec<DestinationRow>> {
        let query = builder::popular_destinations(Dialect::Sqlite);
        self.run(&query, DestinationRow::from_row)
    }

    /// Active attractions of one city, best rated first.
    pub fn city_attractions(&self, city_id: i64) -> Result<Vec<AttractionRow>> {
        let query = builder::city_attractions(Dialect::Sqlite, city_id);
        self.run(&query, AttractionRow::from_row)
    }

    /// Primary key of the first city named exactly `name`.
    pub fn city_id(&self, name: &str) -> Result<Option<i64>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id FROM cities WHERE name = ?1 ORDER BY id LIMIT 1")?;
        Ok(stmt.query_row([name], |row| row.get(0)).optional()?)
    }
}

fn register_casefold(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|s| fold_key(&s)))
        },
    )
}

impl TravelStore for SqlStore {
    fn cities(&self, filter: &CityFilter) -> Result<Vec<City>> {
        self.run(&builder::cities(Dialect::Sqlite, filter), City::from_row)
    }

    fn attractions(&self, filter: &AttractionFilter) -> Result<Vec<Attraction>> {
        self.run(
            &builder::attractions(Dialect::Sqlite, filter),
            Attraction::from_row,
        )
    }

    fn destinations(&self, filter: &DestinationFilter) -> Result<Vec<Destination>> {
        self.run(
            &builder::destinations(Dialect::Sqlite, filter),
            Destination::from_row,
        )
    }

    fn search_cities(&self, query: &str) -> Result<Vec<City>> {
        self.run(&builder::search_cities(Dialect::Sqlite, query), City::from_row)
    }

    fn attractions_by_city(&self, city_name: &str) -> Result<Vec<Attraction>> {
        self.run(
            &builder::attractions_by_city(Dialect::Sqlite, city_name),
            Attraction::from_row,
        )
    }

    fn search_destinations(&self, search: &DestinationSearch) -> Result<Vec<City>> {
        self.run(
            &builder::search_destinations(Dialect::Sqlite, search),
            City::from_row,
        )
    }

    fn countries(&self) -> Result<Vec<String>> {
        self.names(&builder::countries(Dialect::Sqlite))
    }

    fn attraction_categories(&self) -> Result<Vec<String>> {
        self.names(&builder::attraction_categories(Dialect::Sqlite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casefold_handles_non_ascii() {
        let store = SqlStore::open_in_memory().unwrap();
        let folded: String = store
            .connection()
            .query_row("SELECT casefold('ÉCOLE Über')", [], |r| r.get(0))
            .unwrap();
        assert_eq!(folded, "école über");
    }

    #[test]
    fn schema_is_idempotent() {
        let store = SqlStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(schema::ddl(Dialect::Sqlite))
            .unwrap();
        assert!(store.countries().unwrap().is_empty());
    }

    #[test]
    fn wildcards_in_terms_are_literal() {
        let store = SqlStore::open_in_memory().unwrap();
        let conn = store.connection();
        conn.execute("INSERT INTO countries (name) VALUES ('France')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO cities (name, country_id) VALUES ('Paris', 1), ('100% Town', 1)",
            [],
        )
        .unwrap();

        let hits = store.search_cities("%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "100% Town");
        assert!(store.search_cities("_aris").unwrap().is_empty());
    }

    #[test]
    fn null_columns_come_back_missing() {
        let store = SqlStore::open_in_memory().unwrap();
        let conn = store.connection();
        conn.execute("INSERT INTO countries (name) VALUES ('Peru')", [])
            .unwrap();
        conn.execute("INSERT INTO cities (name, country_id) VALUES ('Cusco', 1)", [])
            .unwrap();

        let city = &store.cities(&CityFilter::new()).unwrap()[0];
        assert!(city.average_cost_per_day.is_missing());
        assert_eq!(city.description, "");
        assert!(store
            .cities(&CityFilter::new().max_cost(1_000.0))
            .unwrap()
            .is_empty());
    }
}
