// crates/tripdb-core/src/sql/builder.rs

//! Parameterized SQL construction.
//!
//! Every caller-supplied value becomes a bound parameter; the SQL text only
//! ever contains placeholders. A predicate is appended only when its option
//! is present, so an absent filter leaves no trace in the statement.

use super::PAGE_SIZE;
use crate::filter::{AttractionFilter, CityFilter, DestinationFilter, DestinationSearch};
use crate::text::{fold_key, like_pattern, non_blank};

/// Target SQL flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `?N` placeholders; folding through the registered `casefold()` function.
    Sqlite,
    /// `$N` placeholders; folding through `LOWER()`.
    Postgres,
}

impl Dialect {
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Dialect::Sqlite => format!("?{n}"),
            Dialect::Postgres => format!("${n}"),
        }
    }

    pub fn fold(self, expr: &str) -> String {
        match self {
            Dialect::Sqlite => format!("casefold({expr})"),
            Dialect::Postgres => format!("LOWER({expr})"),
        }
    }

    fn truth(self) -> &'static str {
        match self {
            Dialect::Sqlite => "1",
            Dialect::Postgres => "TRUE",
        }
    }
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Real(f64),
    Integer(i64),
}

/// SQL text plus its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Accumulates `WHERE` predicates and their parameters.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Dialect,
    head: String,
    predicates: Vec<String>,
    params: Vec<SqlValue>,
    order_by: Option<String>,
    limit: Option<usize>,
}

impl QueryBuilder {
    /// `head` is everything up to (not including) `WHERE`.
    pub fn new(dialect: Dialect, head: impl Into<String>) -> Self {
        Self {
            dialect,
            head: head.into(),
            predicates: Vec::new(),
            params: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Binds `value` and returns its placeholder.
    pub fn bind(&mut self, value: SqlValue) -> String {
        self.params.push(value);
        self.dialect.placeholder(self.params.len())
    }

    /// Appends a fixed predicate (no caller input).
    pub fn filter(&mut self, predicate: impl Into<String>) -> &mut Self {
        self.predicates.push(predicate.into());
        self
    }

    /// Substring match of `term` against any of `columns`, case-insensitive.
    /// The term is bound once and shared by every column.
    pub fn contains_any(&mut self, columns: &[&str], term: &str) -> &mut Self {
        let ph = self.bind(SqlValue::Text(like_pattern(term)));
        let ors: Vec<String> = columns
            .iter()
            .map(|col| format!("{} LIKE {ph} ESCAPE '\\'", self.dialect.fold(col)))
            .collect();
        let predicate = if ors.len() == 1 {
            ors.into_iter().collect()
        } else {
            format!("({})", ors.join(" OR "))
        };
        self.filter(predicate)
    }

    /// Case-insensitive equality.
    pub fn equals_folded(&mut self, column: &str, term: &str) -> &mut Self {
        let ph = self.bind(SqlValue::Text(fold_key(term)));
        let predicate = format!("{} = {ph}", self.dialect.fold(column));
        self.filter(predicate)
    }

    pub fn at_most(&mut self, column: &str, bound: f64) -> &mut Self {
        let ph = self.bind(SqlValue::Real(bound));
        self.filter(format!("{column} <= {ph}"))
    }

    pub fn at_least(&mut self, column: &str, bound: f64) -> &mut Self {
        let ph = self.bind(SqlValue::Real(bound));
        self.filter(format!("{column} >= {ph}"))
    }

    pub fn at_least_int(&mut self, column: &str, bound: i64) -> &mut Self {
        let ph = self.bind(SqlValue::Integer(bound));
        self.filter(format!("{column} >= {ph}"))
    }

    pub fn eq_int(&mut self, column: &str, value: i64) -> &mut Self {
        let ph = self.bind(SqlValue::Integer(value));
        self.filter(format!("{column} = {ph}"))
    }

    /// `column` is true in this dialect's boolean spelling.
    pub fn is_true(&mut self, column: &str) -> &mut Self {
        let predicate = format!("{column} = {}", self.dialect.truth());
        self.filter(predicate)
    }

    pub fn order_by(&mut self, clause: impl Into<String>) -> &mut Self {
        self.order_by = Some(clause.into());
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    pub fn build(&self) -> BuiltQuery {
        let mut sql = self.head.trim_end().to_string();
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        BuiltQuery {
            sql,
            params: self.params.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Statements for the shared filter contract
// ---------------------------------------------------------------------------

pub(crate) const CITY_COLUMNS: &str = "SELECT c.id, c.name, co.name, c.latitude, c.longitude, \
     c.population, c.average_cost_per_day, c.description, c.image_url \
     FROM cities c JOIN countries co ON co.id = c.country_id";

pub(crate) const ATTRACTION_COLUMNS: &str = "SELECT a.id, a.city_id, a.name, c.name, a.category, \
     a.description, a.latitude, a.longitude, a.average_visit_duration, a.average_cost, a.rating, \
     a.image_url, a.website_url \
     FROM attractions a JOIN cities c ON c.id = a.city_id";

pub(crate) const DESTINATION_COLUMNS: &str = "SELECT d.id, d.name, co.name, d.latitude, d.longitude, \
     d.population, d.average_cost_per_day, d.description \
     FROM destinations d JOIN countries co ON co.id = d.country_id";

/// One row per city with its country code, a representative image, and how
/// many trips include it.
pub(crate) const DESTINATION_ROW_COLUMNS: &str = "SELECT c.id, c.name, co.name, co.iso_code, \
     c.latitude, c.longitude, c.average_cost_per_day, \
     COALESCE(c.image_url, (SELECT a.image_url FROM attractions a \
         WHERE a.city_id = c.id AND a.image_url IS NOT NULL ORDER BY a.id LIMIT 1)), \
     (SELECT COUNT(DISTINCT td.trip_id) FROM trip_destinations td WHERE td.city_id = c.id) \
     FROM cities c JOIN countries co ON co.id = c.country_id";

const BY_CITY_NAME: &str = "c.name, c.id";

fn clamp_u64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

pub fn cities(dialect: Dialect, filter: &CityFilter) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, CITY_COLUMNS);
    if let Some(country) = filter.country_term() {
        q.contains_any(&["co.name"], country);
    }
    if let Some(max) = filter.max_cost {
        q.at_most("c.average_cost_per_day", max);
    }
    if let Some(min) = filter.min_population {
        q.at_least_int("c.population", clamp_u64(min));
    }
    q.order_by(BY_CITY_NAME).limit(PAGE_SIZE).build()
}

pub fn attractions(dialect: Dialect, filter: &AttractionFilter) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, ATTRACTION_COLUMNS);
    q.is_true("a.is_active");
    if let Some(city) = filter.city_term() {
        q.contains_any(&["c.name"], city);
    }
    if let Some(category) = filter.category_term() {
        q.equals_folded("a.category", category);
    }
    if let Some(max) = filter.max_cost {
        q.at_most("a.average_cost", max);
    }
    if let Some(min) = filter.min_rating {
        q.at_least("a.rating", min);
    }
    q.order_by("a.name, a.id").limit(PAGE_SIZE).build()
}

pub fn destinations(dialect: Dialect, filter: &DestinationFilter) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, DESTINATION_COLUMNS);
    if let Some(country) = filter.country_term() {
        q.contains_any(&["co.name"], country);
    }
    if let Some(max) = filter.max_cost {
        q.at_most("d.average_cost_per_day", max);
    }
    q.order_by("d.name, d.id").limit(PAGE_SIZE).build()
}

pub fn search_cities(dialect: Dialect, query: &str) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, CITY_COLUMNS);
    if let Some(term) = non_blank(Some(query)) {
        q.contains_any(&["c.name", "co.name", "COALESCE(c.description, '')"], term);
    }
    q.order_by(BY_CITY_NAME).limit(PAGE_SIZE).build()
}

pub fn attractions_by_city(dialect: Dialect, city_name: &str) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, ATTRACTION_COLUMNS);
    q.is_true("a.is_active");
    q.equals_folded("c.name", city_name);
    q.order_by("a.name, a.id").limit(PAGE_SIZE).build()
}

/// Adds the destination-search predicates to a query over `cities c JOIN
/// countries co`.
fn apply_search(q: &mut QueryBuilder, search: &DestinationSearch) {
    if let Some(term) = search.query_term() {
        q.contains_any(&["c.name", "co.name"], term);
    }
    if let Some(min) = search.budget_min {
        q.at_least("c.average_cost_per_day", min);
    }
    if let Some(max) = search.budget_max {
        q.at_most("c.average_cost_per_day", max);
    }
    if let Some(category) = search.category_term() {
        let dialect = q.dialect();
        let ph = q.bind(SqlValue::Text(fold_key(category)));
        q.filter(format!(
            "EXISTS (SELECT 1 FROM attractions a WHERE a.city_id = c.id AND a.is_active = {} AND {} = {ph})",
            dialect.truth(),
            dialect.fold("a.category"),
        ));
    }
}

pub fn search_destinations(dialect: Dialect, search: &DestinationSearch) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, CITY_COLUMNS);
    apply_search(&mut q, search);
    q.order_by(BY_CITY_NAME).limit(PAGE_SIZE).build()
}

/// `GET /destinations/search` rows.
pub fn destination_rows(dialect: Dialect, search: &DestinationSearch) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, DESTINATION_ROW_COLUMNS);
    apply_search(&mut q, search);
    q.order_by(BY_CITY_NAME).limit(PAGE_SIZE).build()
}

/// `GET /destinations`: most-travelled first.
pub fn popular_destinations(dialect: Dialect) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, DESTINATION_ROW_COLUMNS);
    q.order_by("9 DESC, c.name, c.id").limit(PAGE_SIZE).build()
}

/// `GET /destinations/{cityId}/attractions`: best rated first.
pub fn city_attractions(dialect: Dialect, city_id: i64) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, ATTRACTION_COLUMNS);
    q.eq_int("a.city_id", city_id);
    q.is_true("a.is_active");
    q.order_by("a.rating DESC NULLS LAST, a.name, a.id")
        .limit(PAGE_SIZE)
        .build()
}

pub fn countries(dialect: Dialect) -> BuiltQuery {
    let mut q = QueryBuilder::new(
        dialect,
        "SELECT DISTINCT co.name FROM countries co JOIN cities c ON c.country_id = co.id",
    );
    q.order_by("co.name").limit(PAGE_SIZE).build()
}

pub fn attraction_categories(dialect: Dialect) -> BuiltQuery {
    let mut q = QueryBuilder::new(dialect, "SELECT DISTINCT a.category FROM attractions a");
    q.is_true("a.is_active");
    q.order_by("a.category").limit(PAGE_SIZE).build()
}
