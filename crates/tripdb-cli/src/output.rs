//! Text and JSON rendering of query results.

use serde::Serialize;
use std::io::{self, Write};
use tripdb_core::api::{AttractionView, CityView, DestinationView};
use tripdb_core::{Attraction, City, Destination, Numeric};

/// Where and how results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    pub json: bool,
}

fn fmt_num<T: Copy + std::fmt::Display>(n: &Numeric<T>) -> String {
    match n {
        Numeric::Value(v) => v.to_string(),
        Numeric::Missing => "-".to_string(),
        Numeric::Invalid(raw) => format!("?{raw}"),
    }
}

pub fn city_line(c: &City) -> String {
    format!(
        "{}, {} | cost/day {} | population {}",
        c.name,
        c.country_name,
        fmt_num(&c.average_cost_per_day),
        fmt_num(&c.population)
    )
}

pub fn attraction_line(a: &Attraction) -> String {
    format!(
        "{} ({}) in {} | cost {} | rating {}",
        a.name,
        a.category,
        a.city_name,
        fmt_num(&a.average_cost),
        fmt_num(&a.rating)
    )
}

pub fn destination_line(d: &Destination) -> String {
    format!(
        "{}, {} | cost/day {}",
        d.name,
        d.country_name,
        fmt_num(&d.average_cost_per_day)
    )
}

impl Printer {
    pub fn emit_json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        Ok(())
    }

    fn lines<I: IntoIterator<Item = String>>(&self, lines: I, empty: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let mut any = false;
        for line in lines {
            writeln!(out, "{line}")?;
            any = true;
        }
        if !any {
            writeln!(out, "{empty}")?;
        }
        Ok(())
    }

    pub fn cities(&self, cities: &[&City]) -> anyhow::Result<()> {
        if self.json {
            let views: Vec<CityView> = cities.iter().map(|c| CityView(c)).collect();
            return self.emit_json(&views);
        }
        self.lines(cities.iter().map(|c| city_line(c)), "No cities found.")
    }

    pub fn attractions(&self, attractions: &[&Attraction]) -> anyhow::Result<()> {
        if self.json {
            let views: Vec<AttractionView> = attractions.iter().map(|a| AttractionView(a)).collect();
            return self.emit_json(&views);
        }
        self.lines(
            attractions.iter().map(|a| attraction_line(a)),
            "No attractions found.",
        )
    }

    pub fn destinations(&self, destinations: &[&Destination]) -> anyhow::Result<()> {
        if self.json {
            let views: Vec<DestinationView> =
                destinations.iter().map(|d| DestinationView(d)).collect();
            return self.emit_json(&views);
        }
        self.lines(
            destinations.iter().map(|d| destination_line(d)),
            "No destinations found.",
        )
    }

    pub fn names(&self, names: &[&str]) -> anyhow::Result<()> {
        if self.json {
            return self.emit_json(names);
        }
        self.lines(names.iter().map(|n| n.to_string()), "(none)")
    }
}
