use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for tripdb
#[derive(Debug, Parser)]
#[command(
    name = "tripdb",
    version,
    about = "Query the tripdb travel catalog: cities, attractions and destinations"
)]
pub struct CliArgs {
    /// Directory holding cities.csv, attractions.csv and destinations.csv
    /// (default: the data set bundled with tripdb-core)
    #[arg(short = 'd', long = "data-dir", env = "TRIPDB_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Always parse the CSV sources; do not read or write the binary snapshot
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,

    /// Log output format (logs go to stderr; level from RUST_LOG)
    #[arg(
        long = "log-format",
        env = "TRIPDB_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormatArg::Pretty,
        global = true
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the catalog contents
    Stats,

    /// List cities, optionally filtered
    Cities {
        /// Substring of the country name (case-insensitive)
        #[arg(long)]
        country: Option<String>,
        /// Maximum average cost per day
        #[arg(long = "max-cost")]
        max_cost: Option<f64>,
        /// Minimum population
        #[arg(long = "min-population")]
        min_population: Option<u64>,
    },

    /// List attractions, optionally filtered
    Attractions {
        /// Substring of the city name (case-insensitive)
        #[arg(long)]
        city: Option<String>,
        /// Exact category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
        /// Maximum average cost
        #[arg(long = "max-cost")]
        max_cost: Option<f64>,
        /// Minimum rating
        #[arg(long = "min-rating")]
        min_rating: Option<f64>,
    },

    /// List destinations, optionally filtered
    Destinations {
        /// Substring of the country name (case-insensitive)
        #[arg(long)]
        country: Option<String>,
        /// Maximum average cost per day
        #[arg(long = "max-cost")]
        max_cost: Option<f64>,
    },

    /// Search cities by name, country or description
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },

    /// Attractions of a city (exact name, case-insensitive)
    CityAttractions {
        /// City name, e.g. "paris"
        name: String,
    },

    /// List the distinct country names
    Countries,

    /// List the distinct attraction categories
    Categories,

    /// Seed a SQLite database from the CSV sources
    #[cfg(feature = "sqlite")]
    Import {
        /// SQLite database file (created if missing)
        #[arg(long, env = "TRIPDB_DATABASE")]
        db: PathBuf,
    },

    /// Query a SQLite database the way the HTTP endpoints do
    #[cfg(feature = "sqlite")]
    Query {
        /// SQLite database file
        #[arg(long, env = "TRIPDB_DATABASE")]
        db: PathBuf,

        #[command(subcommand)]
        query: QueryCommand,
    },

    /// Write the catalog as a binary snapshot
    Snapshot {
        /// Output path
        out: PathBuf,
    },
}

#[cfg(feature = "sqlite")]
#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Destinations ranked by trip count
    Popular,

    /// Destination search; budgets are validated like query-string input
    Search {
        #[arg(long)]
        q: Option<String>,
        #[arg(long = "budget-min")]
        budget_min: Option<String>,
        #[arg(long = "budget-max")]
        budget_max: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Active attractions of a city by id, best rated first
    Attractions {
        /// City id
        city_id: String,
    },

    /// Distinct attraction categories
    Categories,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters_and_globals() {
        let args = CliArgs::try_parse_from([
            "tripdb",
            "cities",
            "--country",
            "france",
            "--max-cost",
            "150",
            "--json",
        ])
        .unwrap();
        assert!(args.json);
        match args.command {
            Commands::Cities {
                country, max_cost, ..
            } => {
                assert_eq!(country.as_deref(), Some("france"));
                assert_eq!(max_cost, Some(150.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_cost() {
        assert!(CliArgs::try_parse_from(["tripdb", "cities", "--max-cost", "cheap"]).is_err());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn query_budgets_stay_raw() {
        let args = CliArgs::try_parse_from([
            "tripdb",
            "query",
            "--db",
            "trips.db",
            "search",
            "--budget-max",
            "cheap",
        ])
        .unwrap();
        match args.command {
            Commands::Query {
                query: QueryCommand::Search { budget_max, .. },
                ..
            } => assert_eq!(budget_max.as_deref(), Some("cheap")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
