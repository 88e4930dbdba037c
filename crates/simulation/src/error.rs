//! Error types for block execution, aggregation and runs.

use thiserror::Error;
use types::{ConfigError, SellerId};

/// A single block could not be simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("block offset {offset} is past the run's {opportunities} opportunities")]
    OffsetOutOfRange { offset: u64, opportunities: u64 },
    #[error("auction failed: {0}")]
    Auction(#[from] sim_core::SimCoreError),
}

/// Failure reported by a [`BlockExecutor`](crate::BlockExecutor) for one block.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Block(#[from] BlockError),
    /// The worker running the block was lost or returned nothing usable.
    #[error("worker failed: {0}")]
    Worker(String),
}

/// Block results could not be combined into one run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("no block results to combine")]
    Empty,
    #[error("block at offset {offset} reports a different seller set")]
    SellerSetMismatch { offset: u64 },
    #[error("block at offset {offset} disagrees on {field}")]
    RunConstantMismatch { offset: u64, field: &'static str },
    #[error("seller {seller_id} reports a different {field} across blocks")]
    SellerAttributeMismatch {
        seller_id: SellerId,
        field: &'static str,
    },
}

/// Fatal run error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("block {index} failed")]
    BlockFailed {
        index: u64,
        #[source]
        source: ExecutorError,
    },
    #[error("executor returned {received} results for {expected} blocks")]
    MissingBlocks { expected: usize, received: usize },
    #[error("aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),
}
