// crates/tripdb-core/src/trips.rs

//! Trip planning records, always scoped to the [`Principal`] that owns them.

use crate::error::{Error, Result};
use crate::sql::SqlStore;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// The authenticated caller. Authentication itself happens upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(pub i64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Planning,
    Booked,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Booked => "booked",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "planning" => Ok(TripStatus::Planning),
            "booked" => Ok(TripStatus::Booked),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" => Ok(TripStatus::Cancelled),
            other => Err(Error::InvalidTrip(format!("unknown status {other:?}"))),
        }
    }
}

/// Input for [`SqlStore::create_trip`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub status: Option<TripStatus>,
}

impl NewTrip {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidTrip("title is required".into()));
        }
        check_budget(self.budget)?;
        check_dates(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub status: TripStatus,
    pub created_at: String,
}

impl Trip {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status: String = row.get(7)?;
        let status = status.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            budget: row.get(6)?,
            status,
            created_at: row.get(8)?,
        })
    }
}

/// Input for [`SqlStore::add_trip_destination`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTripDestination {
    pub city_id: i64,
    #[serde(default)]
    pub arrival_date: Option<NaiveDate>,
    #[serde(default)]
    pub departure_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDestination {
    pub id: i64,
    pub trip_id: i64,
    pub city_id: i64,
    pub city_name: String,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

impl TripDestination {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            trip_id: row.get(1)?,
            city_id: row.get(2)?,
            city_name: row.get(3)?,
            arrival_date: row.get(4)?,
            departure_date: row.get(5)?,
            budget: row.get(6)?,
        })
    }
}

fn check_budget(budget: Option<f64>) -> Result<()> {
    match budget {
        Some(b) if !b.is_finite() || b < 0.0 => Err(Error::InvalidTrip(format!(
            "budget must be a non-negative number, got {b}"
        ))),
        _ => Ok(()),
    }
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(Error::InvalidTrip(format!(
            "end date {e} is before start date {s}"
        ))),
        _ => Ok(()),
    }
}

const TRIP_COLUMNS: &str = "SELECT id, user_id, title, description, start_date, end_date, budget, \
     status, created_at FROM trips";

impl SqlStore {
    pub fn create_trip(&self, principal: Principal, trip: NewTrip) -> Result<Trip> {
        trip.validate()?;
        let status = trip.status.unwrap_or_default();
        self.connection().execute(
            "INSERT INTO trips (user_id, title, description, start_date, end_date, budget, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                principal.0,
                trip.title.trim(),
                trip.description,
                trip.start_date,
                trip.end_date,
                trip.budget,
                status.as_str(),
            ],
        )?;
        let id = self.connection().last_insert_rowid();
        info!(trip_id = id, user_id = principal.0, "trip created");
        self.trip(principal, id)
    }

    /// The principal's trips, newest first.
    pub fn list_trips(&self, principal: Principal) -> Result<Vec<Trip>> {
        let mut stmt = self.connection().prepare_cached(&format!(
            "{TRIP_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([principal.0], Trip::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// One trip, or `NotFound` when it does not exist or is someone else's.
    pub fn trip(&self, principal: Principal, id: i64) -> Result<Trip> {
        let mut stmt = self
            .connection()
            .prepare_cached(&format!("{TRIP_COLUMNS} WHERE id = ?1 AND user_id = ?2"))?;
        stmt.query_row([id, principal.0], Trip::from_row)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("trip {id}")))
    }

    pub fn add_trip_destination(
        &self,
        principal: Principal,
        trip_id: i64,
        stop: NewTripDestination,
    ) -> Result<TripDestination> {
        self.trip(principal, trip_id)?;
        check_budget(stop.budget)?;
        check_dates(stop.arrival_date, stop.departure_date)?;

        let city: Option<i64> = self
            .connection()
            .query_row("SELECT id FROM cities WHERE id = ?1", [stop.city_id], |r| r.get(0))
            .optional()?;
        if city.is_none() {
            return Err(Error::NotFound(format!("city {}", stop.city_id)));
        }

        self.connection().execute(
            "INSERT INTO trip_destinations (trip_id, city_id, arrival_date, departure_date, budget) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                trip_id,
                stop.city_id,
                stop.arrival_date,
                stop.departure_date,
                stop.budget,
            ],
        )?;
        let id = self.connection().last_insert_rowid();
        self.connection()
            .query_row(
                "SELECT td.id, td.trip_id, td.city_id, c.name, td.arrival_date, \
                     td.departure_date, td.budget \
                 FROM trip_destinations td JOIN cities c ON c.id = td.city_id \
                 WHERE td.id = ?1",
                [id],
                TripDestination::from_row,
            )
            .map_err(Into::into)
    }

    /// Stops of one trip in arrival order.
    pub fn trip_destinations(
        &self,
        principal: Principal,
        trip_id: i64,
    ) -> Result<Vec<TripDestination>> {
        self.trip(principal, trip_id)?;
        let mut stmt = self.connection().prepare_cached(
            "SELECT td.id, td.trip_id, td.city_id, c.name, td.arrival_date, \
                 td.departure_date, td.budget \
             FROM trip_destinations td JOIN cities c ON c.id = td.city_id \
             WHERE td.trip_id = ?1 ORDER BY td.arrival_date, td.id",
        )?;
        let rows = stmt.query_map([trip_id], TripDestination::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Deletes the trip and, by cascade, its stops.
    pub fn delete_trip(&self, principal: Principal, id: i64) -> Result<()> {
        let removed = self.connection().execute(
            "DELETE FROM trips WHERE id = ?1 AND user_id = ?2",
            [id, principal.0],
        )?;
        if removed == 0 {
            return Err(Error::NotFound(format!("trip {id}")));
        }
        info!(trip_id = id, user_id = principal.0, "trip deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Principal = Principal(1);
    const BOB: Principal = Principal(2);

    fn store_with_city() -> SqlStore {
        let store = SqlStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                "INSERT INTO countries (name) VALUES ('Italy');
                 INSERT INTO cities (name, country_id) VALUES ('Rome', 1);",
            )
            .unwrap();
        store
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_defaults_to_planning() {
        let store = store_with_city();
        let trip = store
            .create_trip(ALICE, NewTrip::titled("  Roman holiday ").budget(900.0))
            .unwrap();
        assert_eq!(trip.title, "Roman holiday");
        assert_eq!(trip.status, TripStatus::Planning);
        assert_eq!(trip.user_id, 1);
    }

    #[test]
    fn validation_rejects_bad_input() {
        let store = store_with_city();
        for bad in [
            NewTrip::titled("   "),
            NewTrip::titled("x").budget(-1.0),
            NewTrip::titled("x").budget(f64::NAN),
            NewTrip::titled("x").dates(date(2024, 5, 2), date(2024, 5, 1)),
        ] {
            let err = store.create_trip(ALICE, bad).unwrap_err();
            assert!(matches!(err, Error::InvalidTrip(_)), "{err}");
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn trips_are_scoped_to_their_owner() {
        let store = store_with_city();
        let trip = store.create_trip(ALICE, NewTrip::titled("Mine")).unwrap();
        assert!(matches!(store.trip(BOB, trip.id), Err(Error::NotFound(_))));
        assert!(store.list_trips(BOB).unwrap().is_empty());
        assert!(matches!(store.delete_trip(BOB, trip.id), Err(Error::NotFound(_))));
        assert_eq!(store.list_trips(ALICE).unwrap().len(), 1);
    }

    #[test]
    fn stops_require_an_existing_city_and_cascade_on_delete() {
        let store = store_with_city();
        let trip = store
            .create_trip(ALICE, NewTrip::titled("Italy").dates(date(2024, 6, 1), date(2024, 6, 9)))
            .unwrap();

        let missing = NewTripDestination {
            city_id: 99,
            ..Default::default()
        };
        assert!(matches!(
            store.add_trip_destination(ALICE, trip.id, missing),
            Err(Error::NotFound(_))
        ));

        let stop = store
            .add_trip_destination(
                ALICE,
                trip.id,
                NewTripDestination {
                    city_id: 1,
                    arrival_date: Some(date(2024, 6, 1)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(stop.city_name, "Rome");
        assert_eq!(store.popular_destinations().unwrap()[0].trip_count, 1);

        store.delete_trip(ALICE, trip.id).unwrap();
        let left: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM trip_destinations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(left, 0);
    }

    #[test]
    fn popular_destinations_rank_by_trip_count_then_name() {
        let store = SqlStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                "INSERT INTO countries (name) VALUES ('Italy');
                 INSERT INTO cities (name, country_id) VALUES
                     ('Turin', 1), ('Rome', 1), ('Naples', 1), ('Milan', 1);",
            )
            .unwrap();
        let city_id = |name: &str| store.city_id(name).unwrap().unwrap();
        let visit = |title: &str, city: &str| {
            let trip = store.create_trip(ALICE, NewTrip::titled(title)).unwrap();
            store
                .add_trip_destination(
                    ALICE,
                    trip.id,
                    NewTripDestination {
                        city_id: city_id(city),
                        ..Default::default()
                    },
                )
                .unwrap();
        };
        visit("a", "Naples");
        visit("b", "Naples");
        visit("c", "Rome");
        visit("d", "Milan");

        let ranked: Vec<(String, i64)> = store
            .popular_destinations()
            .unwrap()
            .into_iter()
            .map(|r| (r.city_name, r.trip_count))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("Naples".to_string(), 2),
                ("Milan".to_string(), 1),
                ("Rome".to_string(), 1),
                ("Turin".to_string(), 0),
            ]
        );
    }

    #[test]
    fn unknown_stored_status_is_a_database_error() {
        let store = store_with_city();
        let trip = store.create_trip(ALICE, NewTrip::titled("x")).unwrap();
        store
            .connection()
            .execute("UPDATE trips SET status = 'lost' WHERE id = ?1", [trip.id])
            .unwrap();
        let err = store.trip(ALICE, trip.id).unwrap_err();
        assert!(matches!(err, Error::Database(_)), "{err}");
        assert!(!err.is_client_error());
    }

    #[test]
    fn list_is_newest_first() {
        let store = store_with_city();
        let first = store.create_trip(ALICE, NewTrip::titled("one")).unwrap();
        let second = store.create_trip(ALICE, NewTrip::titled("two")).unwrap();
        let ids: Vec<i64> = store.list_trips(ALICE).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
