//! Block executors.
//!
//! An executor takes the planned [`BlockSpec`]s of a run and returns one result
//! per block, in plan order. Blocks share no state, so an executor may run them
//! on any substrate in any order; only the returned order matters.

use types::{BlockResult, SimConfig};

use crate::block::simulate;
use crate::error::ExecutorError;
use crate::session::BlockSpec;

/// Runs planned blocks and reports one result per block.
pub trait BlockExecutor {
    fn execute(
        &self,
        config: &SimConfig,
        specs: &[BlockSpec],
    ) -> Vec<Result<BlockResult, ExecutorError>>;

    /// Human-readable name for logs.
    fn name(&self) -> &'static str {
        "executor"
    }
}

/// In-process executor. Fans blocks out over the rayon pool when the
/// `parallel` feature is enabled, unless `force_sequential` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor {
    pub force_sequential: bool,
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequential() -> Self {
        Self {
            force_sequential: true,
        }
    }

    /// Number of workers blocks will be spread over.
    pub fn workers(&self) -> usize {
        parallel::worker_count(self.force_sequential)
    }
}

impl BlockExecutor for LocalExecutor {
    fn execute(
        &self,
        config: &SimConfig,
        specs: &[BlockSpec],
    ) -> Vec<Result<BlockResult, ExecutorError>> {
        parallel::map_slice(
            specs,
            |spec| simulate(config, spec.seed, spec.offset).map_err(ExecutorError::from),
            self.force_sequential,
        )
    }

    fn name(&self) -> &'static str {
        if self.force_sequential { "local-sequential" } else { "local" }
    }
}
