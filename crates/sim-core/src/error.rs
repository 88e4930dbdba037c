//! Error types for sim-core operations.

use thiserror::Error;

/// Result type for sim-core operations.
pub type Result<T> = std::result::Result<T, SimCoreError>;

/// Errors that can occur while clearing an auction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimCoreError {
    /// Bid and quality vectors disagree on the number of sellers.
    #[error("bid vector has {bids} entries but quality vector has {qualities}")]
    LengthMismatch { bids: usize, qualities: usize },
    /// Fewer slot multipliers than slots to fill.
    #[error("{slots} slots need {slots} multipliers, got {provided}")]
    MissingMultipliers { slots: usize, provided: usize },
}
