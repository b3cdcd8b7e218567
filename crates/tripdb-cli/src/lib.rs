//! tripdb-cli
//! ==========
//!
//! Command-line interface for the `tripdb-core` travel catalog.
//!
//! The binary (`tripdb`) is the primary deliverable; this library target
//! holds its argument parser, log setup and output helpers so they can be
//! tested on their own.
//!
//! Basic usage:
//!
//! ```text
//! tripdb --help
//! tripdb stats
//! tripdb cities --country france --max-cost 150
//! tripdb --json search kyoto
//! tripdb import --db trips.db
//! tripdb query --db trips.db search --q ja --budget-max 120 --category temple
//! ```
//!
//! For programmatic access use the `tripdb-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod args;
pub mod logging;
pub mod output;
