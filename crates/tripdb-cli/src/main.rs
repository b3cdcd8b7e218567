//! tripdb: command-line interface for tripdb-core
//!
//! Loads the travel catalog from a CSV directory (the data set bundled with
//! `tripdb-core` unless `--data-dir` says otherwise) and answers filter and
//! search queries against it. With the `sqlite` feature it can also seed a
//! SQLite database and query it the way the HTTP endpoints do.
//!
//! Usage examples
//! --------------
//!
//! - Show overall stats
//!   $ tripdb stats
//!
//! - Filter cities, attractions or destinations
//!   $ tripdb cities --country japan --min-population 1000000
//!   $ tripdb attractions --category museum --min-rating 4.5
//!
//! - Free-text search over city name, country and description
//!   $ tripdb search "street food"
//!
//! - Seed and query a database
//!   $ tripdb import --db trips.db
//!   $ tripdb query --db trips.db popular
//!
//! Data source
//! -----------
//!
//! The CSV sources are parsed once and cached as a binary snapshot next to
//! them; later runs read the snapshot while it is newer than every CSV. Pass
//! `--no-cache` to always parse.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tripdb_cli::args::{CliArgs, Commands};
use tripdb_cli::logging::init_logging;
use tripdb_cli::output::Printer;
use tripdb_core::loader::SNAPSHOT_SUFFIX;
use tripdb_core::prelude::*;
use tripdb_core::LoadSummary;

fn load(args: &CliArgs) -> anyhow::Result<(Catalog, LoadSummary)> {
    let dir = args
        .data_dir
        .clone()
        .unwrap_or_else(Catalog::default_data_dir);
    let loaded = if args.no_cache {
        Catalog::load_dir(&dir)
    } else {
        Catalog::load_cached(&dir)
    };
    loaded.with_context(|| format!("loading catalog from {}", dir.display()))
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_format);
    let printer = Printer { json: args.json };

    // Database queries do not need the CSV catalog.
    #[cfg(feature = "sqlite")]
    {
        if let Commands::Query { db, query } = &args.command {
            return db::query(db, query, &printer);
        }
    }

    let (catalog, summary) = load(&args)?;

    match &args.command {
        Commands::Stats => {
            let stats = catalog.stats();
            if printer.json {
                printer.emit_json(&serde_json::json!({ "stats": stats, "load": summary }))?;
            } else {
                println!("Catalog statistics:");
                println!("  Countries: {}", stats.countries);
                println!("  Cities: {}", stats.cities);
                println!("  Attractions: {}", stats.attractions);
                println!("  Destinations: {}", stats.destinations);
                if summary.from_snapshot {
                    println!("  (from snapshot)");
                } else {
                    println!("  Degraded rows: {}", summary.degraded_rows);
                    println!("  Skipped rows: {}", summary.skipped_rows);
                    println!("  Orphan attractions: {}", summary.skipped_attractions);
                }
            }
        }

        Commands::Cities {
            country,
            max_cost,
            min_population,
        } => {
            let filter = CityFilter {
                country: country.clone(),
                max_cost: *max_cost,
                min_population: *min_population,
            };
            printer.cities(&catalog.cities(&filter))?;
        }

        Commands::Attractions {
            city,
            category,
            max_cost,
            min_rating,
        } => {
            let filter = AttractionFilter {
                city: city.clone(),
                category: category.clone(),
                max_cost: *max_cost,
                min_rating: *min_rating,
            };
            printer.attractions(&catalog.attractions(&filter))?;
        }

        Commands::Destinations { country, max_cost } => {
            let filter = DestinationFilter {
                country: country.clone(),
                max_cost: *max_cost,
            };
            printer.destinations(&catalog.destinations(&filter))?;
        }

        Commands::Search { query } => printer.cities(&catalog.search_cities(query))?,

        Commands::CityAttractions { name } => {
            printer.attractions(&catalog.attractions_by_city(name))?
        }

        Commands::Countries => printer.names(&catalog.countries())?,

        Commands::Categories => printer.names(&catalog.attraction_categories())?,

        #[cfg(feature = "sqlite")]
        Commands::Import { db } => db::import(db, &catalog, &printer)?,

        #[cfg(feature = "sqlite")]
        Commands::Query { .. } => {}

        Commands::Snapshot { out } => {
            catalog
                .save_snapshot(out)
                .with_context(|| format!("writing snapshot to {}", out.display()))?;
            info!(path = %out.display(), "snapshot written");
            if !out.to_string_lossy().ends_with(SNAPSHOT_SUFFIX) {
                eprintln!("note: snapshots are conventionally named *{SNAPSHOT_SUFFIX}");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "sqlite")]
mod db {
    use anyhow::Context;
    use std::path::Path;
    use tripdb_cli::args::QueryCommand;
    use tripdb_cli::output::Printer;
    use tripdb_core::api::{self, SearchParams};
    use tripdb_core::{Catalog, SqlStore};

    fn open(path: &Path) -> anyhow::Result<SqlStore> {
        SqlStore::open(path).with_context(|| format!("opening database {}", path.display()))
    }

    pub fn import(path: &Path, catalog: &Catalog, printer: &Printer) -> anyhow::Result<()> {
        let mut store = open(path)?;
        let report = store.import_catalog(catalog)?;
        if printer.json {
            printer.emit_json(&report)?;
        } else {
            println!("Imported into {}:", path.display());
            println!("  Countries (new): {}", report.countries);
            println!("  Cities: {}", report.cities);
            println!("  Destinations: {}", report.destinations);
            println!("  Attractions: {}", report.attractions);
            println!("  Skipped attractions: {}", report.skipped_attractions);
        }
        Ok(())
    }

    pub fn query(path: &Path, query: &QueryCommand, printer: &Printer) -> anyhow::Result<()> {
        let store = open(path)?;
        match query {
            QueryCommand::Popular => rows(printer, api::list_destinations(&store)?),
            QueryCommand::Search {
                q,
                budget_min,
                budget_max,
                category,
            } => {
                let params = SearchParams {
                    q: q.clone(),
                    budget_min: budget_min.clone(),
                    budget_max: budget_max.clone(),
                    category: category.clone(),
                };
                rows(printer, api::search_destinations(&store, &params)?)
            }
            QueryCommand::Attractions { city_id } => {
                let attractions = api::city_attractions(&store, city_id)?;
                if printer.json {
                    return printer.emit_json(&attractions);
                }
                for a in &attractions {
                    println!(
                        "#{} {} ({}) | rating {}",
                        a.id,
                        a.name,
                        a.category,
                        a.rating.map_or("-".to_string(), |r| r.to_string())
                    );
                }
                Ok(())
            }
            QueryCommand::Categories => {
                let categories = api::categories(&store)?;
                let names: Vec<&str> = categories.iter().map(String::as_str).collect();
                printer.names(&names)
            }
        }
    }

    fn rows(printer: &Printer, rows: Vec<api::DestinationRow>) -> anyhow::Result<()> {
        if printer.json {
            return printer.emit_json(&rows);
        }
        for r in &rows {
            println!(
                "#{} {}, {} | cost/day {} | trips {}",
                r.id,
                r.city_name,
                r.country_name,
                r.average_cost_per_day
                    .map_or("-".to_string(), |c| c.to_string()),
                r.trip_count
            );
        }
        Ok(())
    }
}
