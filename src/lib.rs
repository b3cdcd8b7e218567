//! tripdb-rs
//!
//! Umbrella crate for the workspace: re-exports [`tripdb_core`] so the demos
//! under `demos/` can `use tripdb_rs::prelude::*`.

pub use tripdb_core::*;
