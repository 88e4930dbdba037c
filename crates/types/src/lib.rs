//! Core types for the auction gym.
//!
//! This crate provides the data shared across the workspace:
//! - Run configuration (`SimConfig`, `WorldConfig`, `SellerConfig`) and its validation
//! - Closed selectors for mechanisms, bidding policies and metric modes
//! - Block and run result rows
//! - Ratio metric definitions (ROAS, ROCS, surplus)
//! - Deterministic seed derivation for independent random streams

pub mod config;
pub mod error;
pub mod ids;
pub mod metrics;
pub mod results;
pub mod seed;

pub use config::{
    MechanismKind, MetricsConfig, PolicyKind, RegulationConfig, RoasMode, RocsMode,
    SECONDS_PER_HOUR, SellerConfig, SimConfig, WorldConfig,
};
pub use error::ConfigError;
pub use ids::{SellerId, Timestamp};
pub use results::{
    BlockMetrics, BlockResult, HistoryPoint, RunMetrics, RunOutput, RunResult, SellerCounters,
    SellerTotals,
};
pub use seed::{STREAM_AUDIENCE, STREAM_POLICY, derive_seed};
