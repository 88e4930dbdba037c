//! Storage layer for the auction gym.
//!
//! **Philosophy:** Declarative, Modular, SoC
//! - Declarative: table schemas are defined upfront in [`schema`]
//! - Modular: a run is written and read through plain functions over a directory
//! - SoC: this crate ONLY handles persistence, no simulation logic
//!
//! A run directory holds:
//! - `sellers.parquet`: per-seller totals with derived ROAS/ROCS/surplus
//! - `metrics.parquet`: one row of run-level metrics
//! - `history.parquet`: per-seller shading/spend snapshots
//! - `summary.json`: the combined run result

mod error;
mod reader;
pub mod schema;
mod writer;

pub use error::{Result, StorageError};
pub use reader::{read_run_sellers, read_seller_totals, read_summary};
pub use writer::{RunFiles, RunWriter};

#[cfg(test)]
mod tests;
