//! Basic usage example for tripdb-rs
//!
//! This example demonstrates how to:
//! - Load the bundled travel catalog
//! - List cities, attractions and destinations
//! - Search by free text and look up a city's attractions

use tripdb_rs::prelude::*;
use tripdb_rs::Result;

fn main() -> Result<()> {
    println!("=== tripdb-rs Basic Usage Example ===\n");

    println!("Loading travel catalog...");
    let (catalog, summary) = Catalog::load_cached(Catalog::default_data_dir())?;
    println!(
        "✓ Catalog loaded ({} cities, {} attractions, {} destinations{})\n",
        summary.cities,
        summary.attractions,
        summary.destinations,
        if summary.from_snapshot { ", from snapshot" } else { "" }
    );

    // Example 1: Countries
    println!("--- Example 1: Countries ---");
    for country in catalog.countries() {
        println!("- {country}");
    }
    println!();

    // Example 2: Cities of one country
    println!("--- Example 2: Cities in Japan ---");
    for city in catalog.cities(&CityFilter::new().country("japan")) {
        println!(
            "{} (cost/day: {:?})",
            city.name,
            city.average_cost_per_day.value()
        );
    }
    println!();

    // Example 3: Free-text search
    println!("--- Example 3: Search \"food\" ---");
    for city in catalog.search_cities("food") {
        println!("{}, {}: {}", city.name, city.country_name, city.description);
    }
    println!();

    // Example 4: Attractions of a city
    println!("--- Example 4: Attractions in paris ---");
    for a in catalog.attractions_by_city("paris") {
        println!("{} [{}] rating {:?}", a.name, a.category, a.rating.value());
    }
    println!();

    // Example 5: Destinations under a budget
    println!("--- Example 5: Destinations under 100/day ---");
    for d in catalog.destinations(&DestinationFilter::new().max_cost(100.0)) {
        println!("{} ({})", d.name, d.description);
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
