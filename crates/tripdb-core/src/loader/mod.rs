// crates/tripdb-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (files, decompression, snapshots) and hands
//! the bytes to [`crate::parser`]. Loading is all-or-nothing: if any of the
//! three sources cannot be read the caller gets [`Error::Load`] and no
//! partially filled catalog.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::model::{Attraction, City, Destination};
use crate::parser::{parse_records, ParseReport, Record};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod common_io;
mod snapshot;

pub use snapshot::SNAPSHOT_SUFFIX;

pub const CITIES_FILE: &str = "cities.csv";
pub const ATTRACTIONS_FILE: &str = "attractions.csv";
pub const DESTINATIONS_FILE: &str = "destinations.csv";

/// What a load produced and what it had to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub cities: usize,
    pub attractions: usize,
    pub destinations: usize,
    /// Attractions dropped because their city is not in the catalog.
    pub skipped_attractions: usize,
    /// Rows kept with one or more degraded fields.
    pub degraded_rows: usize,
    /// Rows the reader could not decode at all.
    pub skipped_rows: usize,
    /// `true` when the catalog came from a binary snapshot.
    pub from_snapshot: bool,
}

impl Catalog {
    /// `data/` next to this crate's manifest.
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    /// Parses the three sources and builds a catalog.
    pub fn from_readers<C, A, D>(
        cities: C,
        attractions: A,
        destinations: D,
    ) -> Result<(Self, LoadSummary)>
    where
        C: Read,
        A: Read,
        D: Read,
    {
        let cities: ParseReport<City> = parse_source(cities, CITIES_FILE)?;
        let attractions: ParseReport<Attraction> = parse_source(attractions, ATTRACTIONS_FILE)?;
        let destinations: ParseReport<Destination> =
            parse_source(destinations, DESTINATIONS_FILE)?;

        let degraded_rows = degraded(&cities) + degraded(&attractions) + degraded(&destinations);
        let skipped_rows = cities.skipped() + attractions.skipped() + destinations.skipped();

        let (catalog, skipped_attractions) =
            Catalog::from_records(cities.records, attractions.records, destinations.records);

        let summary = LoadSummary {
            cities: catalog.all_cities().len(),
            attractions: catalog.all_attractions().len(),
            destinations: catalog.all_destinations().len(),
            skipped_attractions,
            degraded_rows,
            skipped_rows,
            from_snapshot: false,
        };
        info!(
            cities = summary.cities,
            attractions = summary.attractions,
            destinations = summary.destinations,
            skipped_attractions,
            degraded_rows,
            skipped_rows,
            "catalog loaded"
        );
        Ok((catalog, summary))
    }

    /// Loads `cities.csv`, `attractions.csv` and `destinations.csv` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<(Self, LoadSummary)> {
        let dir = dir.as_ref();
        let cities = common_io::open_stream(&dir.join(CITIES_FILE))?;
        let attractions = common_io::open_stream(&dir.join(ATTRACTIONS_FILE))?;
        let destinations = common_io::open_stream(&dir.join(DESTINATIONS_FILE))?;
        Self::from_readers(cities, attractions, destinations)
    }

    /// Like [`Catalog::load_dir`], but never leaves the caller without a
    /// catalog: on failure the catalog is empty and the error is returned
    /// beside it.
    pub fn load_or_empty(dir: impl AsRef<Path>) -> (Self, Result<LoadSummary>) {
        match Self::load_dir(dir) {
            Ok((catalog, summary)) => (catalog, Ok(summary)),
            Err(e) => {
                warn!(error = %e, "catalog load failed; serving an empty catalog");
                (Catalog::empty(), Err(e))
            }
        }
    }

    /// **Smart Load:** uses the binary snapshot in `dir` when it is newer
    /// than every CSV source, otherwise parses the CSVs and refreshes the
    /// snapshot (best effort).
    pub fn load_cached(dir: impl AsRef<Path>) -> Result<(Self, LoadSummary)> {
        let dir = dir.as_ref();
        let cache = snapshot::snapshot_path(dir);
        let sources = [
            dir.join(CITIES_FILE),
            dir.join(ATTRACTIONS_FILE),
            dir.join(DESTINATIONS_FILE),
        ];
        let source_refs: Vec<&Path> = sources.iter().map(PathBuf::as_path).collect();

        if common_io::is_fresh(&cache, &source_refs) {
            match Self::load_snapshot(&cache) {
                Ok(catalog) => {
                    let summary = LoadSummary {
                        cities: catalog.all_cities().len(),
                        attractions: catalog.all_attractions().len(),
                        destinations: catalog.all_destinations().len(),
                        skipped_attractions: catalog.dropped_attractions(),
                        from_snapshot: true,
                        ..LoadSummary::default()
                    };
                    return Ok((catalog, summary));
                }
                Err(e) => warn!(error = %e, path = %cache.display(), "ignoring unreadable snapshot"),
            }
        }

        let (catalog, summary) = Self::load_dir(dir)?;
        if let Err(e) = catalog.save_snapshot(&cache) {
            warn!(error = %e, path = %cache.display(), "could not write snapshot");
        }
        Ok((catalog, summary))
    }
}

fn parse_source<T: Record, R: Read>(reader: R, name: &str) -> Result<ParseReport<T>> {
    parse_records(reader, name).map_err(|e| match e {
        Error::Load { .. } => e,
        other => Error::Load {
            source_name: name.to_string(),
            reason: other.to_string(),
        },
    })
}

/// Rows kept but degraded: distinct lines with a non-skip issue.
fn degraded<T>(report: &ParseReport<T>) -> usize {
    let mut lines: Vec<u64> = report
        .issues
        .iter()
        .filter(|i| !matches!(i.kind, crate::parser::IssueKind::Unreadable(_)))
        .map(|i| i.line)
        .collect();
    lines.dedup();
    lines.len()
}
