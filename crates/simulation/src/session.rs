//! Run orchestration.
//!
//! A [`SimulationSession`] owns the validated configuration and the block plan
//! of one run. It is created before the first block and consumed by
//! [`SimulationSession::run`], which waits for every block before combining.

use tracing::info;
use types::{ConfigError, RunOutput, SimConfig};

use crate::aggregate::RunAccumulator;
use crate::error::SimulationError;
use crate::executor::BlockExecutor;

/// One planned block: `seed = base_seed + index`, `offset = index × batch_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpec {
    pub index: u64,
    pub seed: u64,
    pub offset: u64,
}

#[derive(Debug, Clone)]
pub struct SimulationSession {
    config: SimConfig,
    blocks: Vec<BlockSpec>,
}

impl SimulationSession {
    /// Validate `config` and plan its blocks.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = &config.world;
        let base_seed = world.base_seed();
        let blocks = (0..world.block_count())
            .map(|index| BlockSpec {
                index,
                seed: base_seed.wrapping_add(index),
                offset: index * world.batch_size,
            })
            .collect();
        Ok(Self { config, blocks })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn blocks(&self) -> &[BlockSpec] {
        &self.blocks
    }

    /// Execute every block and combine the results.
    ///
    /// Fails on the first failed or missing block; nothing partial is returned.
    pub fn run(self, executor: &impl BlockExecutor) -> Result<RunOutput, SimulationError> {
        info!(
            blocks = self.blocks.len(),
            sellers = self.config.sellers.len(),
            opportunities = self.config.world.opportunities,
            mechanism = %self.config.world.mechanism,
            executor = executor.name(),
            "starting run"
        );

        let results = executor.execute(&self.config, &self.blocks);
        if results.len() != self.blocks.len() {
            return Err(SimulationError::MissingBlocks {
                expected: self.blocks.len(),
                received: results.len(),
            });
        }

        let mut acc = RunAccumulator::new();
        let mut history = Vec::new();
        for (spec, result) in self.blocks.iter().zip(results) {
            let block = result.map_err(|source| SimulationError::BlockFailed {
                index: spec.index,
                source,
            })?;
            acc.absorb(&block)?;
            history.extend(block.history);
        }
        let run = acc.finish()?;

        info!(
            platform_revenue = run.metrics.platform_revenue,
            social_welfare = run.metrics.social_welfare,
            user_experience = run.metrics.user_experience,
            "run complete"
        );
        Ok(RunOutput { run, history })
    }
}
