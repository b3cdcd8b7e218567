//! Error handling example for tripdb-rs
//!
//! Demonstrates how load failures, degraded rows and invalid filter input
//! surface to the caller.

use tripdb_rs::api::{self, SearchParams};
use tripdb_rs::prelude::*;
use tripdb_rs::{Error, Result};

fn main() -> Result<()> {
    println!("=== tripdb-rs Error Handling Example ===\n");

    // Example 1: a missing source is a load error, and the catalog stays empty
    println!("--- Example 1: Loading from a directory without CSV files ---");
    let (catalog, result) = Catalog::load_or_empty("/nonexistent/path");
    match result {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("✓ load failed: {e}"),
    }
    println!("catalog empty: {}\n", catalog.is_empty());

    // Example 2: a bad number degrades one field, not the row
    println!("--- Example 2: Degraded numeric fields ---");
    let cities = "name,country_name,latitude,longitude,population,average_cost_per_day,description,image_url\n\
                  Nice,France,43.7,7.26,342000,n/a,Riviera,\n";
    let header_only_a = "name,city_name,category,description,latitude,longitude,average_visit_duration,average_cost,rating,image_url,website_url\n";
    let header_only_d = "name,country_name,latitude,longitude,population,average_cost_per_day,description\n";
    let (catalog, summary) = Catalog::from_readers(
        cities.as_bytes(),
        header_only_a.as_bytes(),
        header_only_d.as_bytes(),
    )?;
    let nice = &catalog.all_cities()[0];
    println!(
        "degraded rows: {} | cost invalid: {} | matches max_cost filter: {}\n",
        summary.degraded_rows,
        nice.average_cost_per_day.is_invalid(),
        !catalog.cities(&CityFilter::new().max_cost(1_000.0)).is_empty()
    );

    // Example 3: invalid filter input is a client error
    println!("--- Example 3: Invalid budget ---");
    match DestinationSearch::from_raw(None, None, Some("cheap"), None) {
        Err(e @ Error::InvalidFilter { .. }) => {
            println!("✓ rejected: {e} (client error: {})", e.is_client_error())
        }
        other => println!("unexpected: {other:?}"),
    }
    println!();

    // Example 4: the same mistake through the endpoint layer
    println!("--- Example 4: Endpoint error mapping ---");
    let store = SqlStore::open_in_memory()?;
    let params = SearchParams {
        budget_min: Some("NaN".into()),
        ..Default::default()
    };
    if let Err(e) = api::search_destinations(&store, &params) {
        println!("HTTP {} {}", e.status, e.body());
    }
    if let Err(e) = api::city_attractions(&store, "paris") {
        println!("HTTP {} {}", e.status, e.body());
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
