//! Advanced filtering example for tripdb-rs
//!
//! Shows composed filters, the destination search, and the same query
//! answered by the in-memory catalog and by SQLite through the shared
//! `TravelStore` trait.

use tripdb_rs::prelude::*;
use tripdb_rs::Result;

/// Works with any backend.
fn cheap_museum_cities<S: TravelStore>(store: &S) -> Result<Vec<String>> {
    let search = DestinationSearch::new()
        .budget(None, Some(150.0))
        .category("museum");
    let mut names: Vec<String> = store
        .search_destinations(&search)?
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    Ok(names)
}

fn main() -> Result<()> {
    println!("=== tripdb-rs Advanced Filtering Example ===\n");
    let (catalog, _) = Catalog::load_dir(Catalog::default_data_dir())?;

    // Example 1: every option at once
    println!("--- Example 1: Big, affordable cities with an 'a' in the country ---");
    let filter = CityFilter::new()
        .country("a")
        .max_cost(150.0)
        .min_population(1_000_000);
    for city in catalog.cities(&filter) {
        println!(
            "{}, {} | population {:?} | cost/day {:?}",
            city.name,
            city.country_name,
            city.population.value(),
            city.average_cost_per_day.value()
        );
    }
    println!();

    // Example 2: attraction filters
    println!("--- Example 2: Free or cheap landmarks rated 4.5+ ---");
    let filter = AttractionFilter::new()
        .category("landmark")
        .max_cost(10.0)
        .min_rating(4.5);
    for a in catalog.attractions(&filter) {
        println!("{} in {}", a.name, a.city_name);
    }
    println!();

    // Example 3: raw query-string input, validated
    println!("--- Example 3: Destination search from raw input ---");
    let search = DestinationSearch::from_raw(Some("ja"), Some("50"), Some("150"), Some(""))?;
    for city in catalog.search_destinations(&search) {
        println!("{}, {}", city.name, city.country_name);
    }
    println!();

    // Example 4: one query, two backends
    println!("--- Example 4: Catalog vs SQLite ---");
    let mut store = SqlStore::open_in_memory()?;
    let report = store.import_catalog(&catalog)?;
    println!(
        "Imported {} cities and {} attractions",
        report.cities, report.attractions
    );
    let from_memory = cheap_museum_cities(&catalog)?;
    let from_sql = cheap_museum_cities(&store)?;
    println!("catalog: {from_memory:?}");
    println!("sqlite:  {from_sql:?}");
    println!("agree:   {}", from_memory == from_sql);

    println!("\n=== Example completed successfully ===");
    Ok(())
}
