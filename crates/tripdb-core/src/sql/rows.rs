// crates/tripdb-core/src/sql/rows.rs
use crate::model::{Attraction, City, Destination, Numeric};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

fn float(row: &Row, idx: usize) -> rusqlite::Result<Numeric<f64>> {
    Ok(Numeric::from(row.get::<_, Option<f64>>(idx)?))
}

fn count(row: &Row, idx: usize) -> rusqlite::Result<Numeric<u64>> {
    let raw: Option<i64> = row.get(idx)?;
    Ok(Numeric::from(raw.and_then(|v| u64::try_from(v).ok())))
}

fn text(row: &Row, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

impl City {
    pub(crate) fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            name: row.get(1)?,
            country_name: row.get(2)?,
            latitude: float(row, 3)?,
            longitude: float(row, 4)?,
            population: count(row, 5)?,
            average_cost_per_day: float(row, 6)?,
            description: text(row, 7)?,
            image_url: row.get(8)?,
        })
    }
}

impl Attraction {
    pub(crate) fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let minutes: Option<i64> = row.get(8)?;
        Ok(Self {
            name: row.get(2)?,
            city_name: row.get(3)?,
            category: row.get(4)?,
            description: text(row, 5)?,
            latitude: float(row, 6)?,
            longitude: float(row, 7)?,
            average_visit_duration: Numeric::from(minutes.and_then(|v| u32::try_from(v).ok())),
            average_cost: float(row, 9)?,
            rating: float(row, 10)?,
            image_url: row.get(11)?,
            website_url: row.get(12)?,
        })
    }
}

impl Destination {
    pub(crate) fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            name: row.get(1)?,
            country_name: row.get(2)?,
            latitude: float(row, 3)?,
            longitude: float(row, 4)?,
            population: count(row, 5)?,
            average_cost_per_day: float(row, 6)?,
            description: text(row, 7)?,
        })
    }
}

/// A city as the destination endpoints return it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationRow {
    pub id: i64,
    pub city_name: String,
    pub country_name: String,
    pub iso_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub average_cost_per_day: Option<f64>,
    /// The city's own image, else its first attraction's.
    pub image_url: Option<String>,
    /// Distinct trips that include this city.
    pub trip_count: i64,
}

impl DestinationRow {
    pub(crate) fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            city_name: row.get(1)?,
            country_name: row.get(2)?,
            iso_code: row.get(3)?,
            latitude: row.get(4)?,
            longitude: row.get(5)?,
            average_cost_per_day: row.get(6)?,
            image_url: row.get(7)?,
            trip_count: row.get(8)?,
        })
    }
}

/// A stored attraction with its keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionRow {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub city_name: String,
    pub category: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub average_visit_duration: Option<i64>,
    pub average_cost: Option<f64>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub website_url: Option<String>,
}

impl AttractionRow {
    pub(crate) fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            city_id: row.get(1)?,
            name: row.get(2)?,
            city_name: row.get(3)?,
            category: row.get(4)?,
            description: row.get(5)?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
            average_visit_duration: row.get(8)?,
            average_cost: row.get(9)?,
            rating: row.get(10)?,
            image_url: row.get(11)?,
            website_url: row.get(12)?,
        })
    }
}
