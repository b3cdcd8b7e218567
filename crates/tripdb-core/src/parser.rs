// crates/tripdb-core/src/parser.rs

//! # Record parser
//!
//! Turns comma-delimited text into typed records. Columns are positional
//! (the header row is required but its names are not consulted); quoted
//! fields may contain commas. Parsing is tolerant: a bad number degrades to
//! [`Numeric::Invalid`], a short row fills the missing columns as blank, and
//! a row the reader cannot decode is skipped. Everything that was degraded
//! is listed in the returned [`ParseReport`].

use crate::error::{Error, Result};
use crate::model::{Attraction, City, Destination, Numeric};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fmt;
use std::io::Read;
use tracing::warn;

/// Records parsed from one source, plus whatever had to be degraded.
#[derive(Debug, Clone)]
pub struct ParseReport<T> {
    pub records: Vec<T>,
    pub issues: Vec<RowIssue>,
}

impl<T> ParseReport<T> {
    /// Rows dropped entirely (as opposed to degraded in place).
    pub fn skipped(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::Unreadable(_)))
            .count()
    }
}

/// A degraded or skipped row. `line` is 1-based and counts the header.
#[derive(Debug, Clone, PartialEq)]
pub struct RowIssue {
    pub line: u64,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// The row could not be decoded and was skipped.
    Unreadable(String),
    /// The row had fewer columns than the entity needs.
    ShortRow { expected: usize, found: usize },
    /// A numeric column held text that is not a valid value.
    InvalidNumber { column: &'static str, raw: String },
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Unreadable(reason) => write!(f, "line {}: skipped ({reason})", self.line),
            IssueKind::ShortRow { expected, found } => write!(
                f,
                "line {}: {found} of {expected} columns present",
                self.line
            ),
            IssueKind::InvalidNumber { column, raw } => {
                write!(f, "line {}: invalid {column} {raw:?}", self.line)
            }
        }
    }
}

/// An entity that can be built from one positional row.
pub trait Record: Sized {
    /// Column names, in source order.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &mut Row<'_>) -> Self;
}

/// Positional view over one data row that records issues as it is read.
pub struct Row<'a> {
    record: &'a StringRecord,
    line: u64,
    issues: &'a mut Vec<RowIssue>,
    columns: &'static [&'static str],
}

impl Row<'_> {
    /// Required text column; blank when absent.
    pub fn text(&self, idx: usize) -> String {
        self.record.get(idx).map(strip_quotes).unwrap_or_default()
    }

    /// Optional text column; `None` when absent or blank.
    pub fn opt_text(&self, idx: usize) -> Option<String> {
        Some(self.text(idx)).filter(|s| !s.is_empty())
    }

    pub fn float(&mut self, idx: usize) -> Numeric<f64> {
        let v = Numeric::<f64>::parse_float(self.raw(idx));
        self.note(idx, v)
    }

    pub fn amount(&mut self, idx: usize) -> Numeric<f64> {
        let v = Numeric::<f64>::parse_amount(self.raw(idx));
        self.note(idx, v)
    }

    pub fn count(&mut self, idx: usize) -> Numeric<u64> {
        let v = Numeric::<u64>::parse_count(self.raw(idx));
        self.note(idx, v)
    }

    pub fn minutes(&mut self, idx: usize) -> Numeric<u32> {
        let v = Numeric::<u32>::parse_minutes(self.raw(idx));
        self.note(idx, v)
    }

    fn raw(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or("")
    }

    fn note<T>(&mut self, idx: usize, v: Numeric<T>) -> Numeric<T> {
        if let Numeric::Invalid(raw) = &v {
            self.issues.push(RowIssue {
                line: self.line,
                kind: IssueKind::InvalidNumber {
                    column: self.columns.get(idx).copied().unwrap_or("?"),
                    raw: raw.clone(),
                },
            });
        }
        v
    }
}

/// Strips one pair of surrounding double quotes left over after trimming.
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(s)
        .to_string()
}

/// Parses every data row of `reader` into `T`.
///
/// Fails only when the source cannot be read or has no header row.
pub fn parse_records<T: Record, R: Read>(reader: R, source_name: &str) -> Result<ParseReport<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header_len = rdr.headers()?.len();
    if header_len == 0 {
        return Err(Error::MissingHeader {
            source_name: source_name.to_string(),
        });
    }

    let mut records = Vec::new();
    let mut issues = Vec::new();

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                if e.is_io_error() {
                    return Err(Error::Csv(e));
                }
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!(source = source_name, line, error = %e, "skipping unreadable row");
                issues.push(RowIssue {
                    line,
                    kind: IssueKind::Unreadable(e.to_string()),
                });
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let first_issue = issues.len();
        if record.len() < T::COLUMNS.len() {
            issues.push(RowIssue {
                line,
                kind: IssueKind::ShortRow {
                    expected: T::COLUMNS.len(),
                    found: record.len(),
                },
            });
        }

        let mut row = Row {
            record: &record,
            line,
            issues: &mut issues,
            columns: T::COLUMNS,
        };
        records.push(T::from_row(&mut row));

        for issue in &issues[first_issue..] {
            warn!(source = source_name, "{issue}");
        }
    }

    Ok(ParseReport { records, issues })
}

/// Convenience wrapper over [`parse_records`] for in-memory text.
pub fn parse_str<T: Record>(text: &str, source_name: &str) -> Result<ParseReport<T>> {
    parse_records(text.as_bytes(), source_name)
}

impl Record for City {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "country_name",
        "latitude",
        "longitude",
        "population",
        "average_cost_per_day",
        "description",
        "image_url",
    ];

    fn from_row(row: &mut Row<'_>) -> Self {
        City {
            name: row.text(0),
            country_name: row.text(1),
            latitude: row.float(2),
            longitude: row.float(3),
            population: row.count(4),
            average_cost_per_day: row.amount(5),
            description: row.text(6),
            image_url: row.opt_text(7),
        }
    }
}

impl Record for Attraction {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "city_name",
        "category",
        "description",
        "latitude",
        "longitude",
        "average_visit_duration",
        "average_cost",
        "rating",
        "image_url",
        "website_url",
    ];

    fn from_row(row: &mut Row<'_>) -> Self {
        Attraction {
            name: row.text(0),
            city_name: row.text(1),
            category: row.text(2),
            description: row.text(3),
            latitude: row.float(4),
            longitude: row.float(5),
            average_visit_duration: row.minutes(6),
            average_cost: row.amount(7),
            rating: row.float(8),
            image_url: row.opt_text(9),
            website_url: row.opt_text(10),
        }
    }
}

impl Record for Destination {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "country_name",
        "latitude",
        "longitude",
        "population",
        "average_cost_per_day",
        "description",
    ];

    fn from_row(row: &mut Row<'_>) -> Self {
        Destination {
            name: row.text(0),
            country_name: row.text(1),
            latitude: row.float(2),
            longitude: row.float(3),
            population: row.count(4),
            average_cost_per_day: row.amount(5),
            description: row.text(6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: &str = "\
name,country_name,latitude,longitude,population,average_cost_per_day,description,image_url
Paris,France,48.8566,2.3522,2148000,180,\"City of light, art and food\",https://img/paris.jpg
Kyoto,Japan,35.0116,135.7681,1475000,120,Temples and gardens,
";

    #[test]
    fn parses_rows_in_order_with_quoted_commas() {
        let report = parse_str::<City>(CITIES, "cities.csv").unwrap();
        assert!(report.issues.is_empty());
        assert_eq!(report.records.len(), 2);

        let paris = &report.records[0];
        assert_eq!(paris.name, "Paris");
        assert_eq!(paris.description, "City of light, art and food");
        assert_eq!(paris.population, Numeric::Value(2_148_000));
        assert_eq!(paris.image_url.as_deref(), Some("https://img/paris.jpg"));

        let kyoto = &report.records[1];
        assert_eq!(kyoto.name, "Kyoto");
        assert_eq!(kyoto.image_url, None);
    }

    #[test]
    fn bad_number_degrades_one_field() {
        let text = "h\nRome,Italy,41.9,abc,2873000,150,Eternal city,\n";
        let report = parse_str::<City>(text, "cities.csv").unwrap();
        assert_eq!(report.records.len(), 1);
        let rome = &report.records[0];
        assert_eq!(rome.latitude, Numeric::Value(41.9));
        assert_eq!(rome.longitude, Numeric::Invalid("abc".into()));
        assert_eq!(rome.average_cost_per_day, Numeric::Value(150.0));
        assert_eq!(
            report.issues,
            vec![RowIssue {
                line: 2,
                kind: IssueKind::InvalidNumber {
                    column: "longitude",
                    raw: "abc".into()
                }
            }]
        );
    }

    #[test]
    fn short_row_is_degraded_not_dropped() {
        let text = "h\nLisbon,Portugal,38.7\nPorto,Portugal,41.1,-8.6,231800,90,River city\n";
        let report = parse_str::<Destination>(text, "destinations.csv").unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].population, Numeric::Missing);
        assert_eq!(report.records[0].description, "");
        assert_eq!(report.skipped(), 0);
        assert!(matches!(
            report.issues[0].kind,
            IssueKind::ShortRow { expected: 7, found: 3 }
        ));
    }

    #[test]
    fn missing_header_is_fatal() {
        let err = parse_str::<City>("", "cities.csv").unwrap_err();
        assert!(matches!(err, Error::MissingHeader { .. }));
    }

    #[test]
    fn header_only_yields_no_records() {
        let report = parse_str::<Attraction>("name,city_name\n", "attractions.csv").unwrap();
        assert!(report.records.is_empty());
    }

    #[test]
    fn blank_lines_are_ignored() {
        let text = "h\n\nOslo,Norway,59.9,10.7,700000,160,Fjords\n\n";
        let report = parse_str::<City>(text, "cities.csv").unwrap();
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn surrounding_quotes_are_stripped_after_padding() {
        let text = "h\nLouvre, Paris ,  \"museum\"  ,desc,,,,,,,\n";
        let report = parse_str::<Attraction>(text, "attractions.csv").unwrap();
        let a = &report.records[0];
        assert_eq!(a.city_name, "Paris");
        assert_eq!(a.category, "museum");
        assert!(a.rating.is_missing());
    }

    #[test]
    fn undecodable_row_is_skipped() {
        let mut bytes = b"h\n".to_vec();
        bytes.extend_from_slice(b"Bad\xff,Nowhere\n");
        bytes.extend_from_slice(b"Quito,Ecuador,-0.18,-78.47,2011000,55,Andes\n");
        let report = parse_records::<City, _>(&bytes[..], "cities.csv").unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "Quito");
        assert_eq!(report.skipped(), 1);
    }
}
