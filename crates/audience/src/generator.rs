//! Opportunity generator.
//!
//! [`AudienceGenerator`] produces the bulk arrays a block needs before its
//! sequential auction loop: unit-norm user interest vectors, arrival
//! timestamps and the diurnal CTR factor of each arrival. It then scores those
//! users against seller embeddings.
//!
//! # Usage
//!
//! ```ignore
//! let mut generator = AudienceGenerator::new(AudienceConfig::from_world(&world), seed);
//! let batch = generator.batch(count, TimeWindow::from_hours(world.start_ts, 24));
//! let scored = generator.score(&batch, &seller_vectors);
//! ```

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use types::{SECONDS_PER_HOUR, Timestamp};

use crate::config::{AudienceConfig, TimeWindow};
use crate::features::Embeddings;
use crate::scoring::{self, ScoredOpportunities};

/// Bulk arrays for one block, indexed by arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityBatch {
    pub user_vectors: Embeddings,
    /// Ascending arrival timestamps.
    pub timestamps: Vec<Timestamp>,
    /// CTR multiplier for each arrival's hour of day.
    pub diurnal_factors: Vec<f64>,
}

impl OpportunityBatch {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Deterministic generator for synthetic ad requests.
pub struct AudienceGenerator {
    config: AudienceConfig,
    rng: StdRng,
}

impl AudienceGenerator {
    pub fn new(config: AudienceConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &AudienceConfig {
        &self.config
    }

    /// Draw `count` opportunities with timestamps inside `window`.
    pub fn batch(&mut self, count: usize, window: TimeWindow) -> OpportunityBatch {
        let user_vectors = Embeddings::unit(&mut self.rng, count, self.config.embedding_dim);

        let span = window.span_secs.max(1);
        let mut timestamps: Vec<Timestamp> = (0..count)
            .map(|_| window.start + self.rng.random_range(0..span))
            .collect();
        timestamps.sort_unstable();

        let diurnal_factors = timestamps
            .iter()
            .map(|&ts| diurnal_factor(ts, self.config.diurnal_amplitude))
            .collect();

        OpportunityBatch {
            user_vectors,
            timestamps,
            diurnal_factors,
        }
    }

    /// Score a batch against seller embeddings, consuming noise draws from this generator.
    pub fn score(&mut self, batch: &OpportunityBatch, sellers: &Embeddings) -> ScoredOpportunities {
        scoring::score_opportunities(batch, sellers, &self.config, &mut self.rng)
    }
}

/// Draw one block's arrays. Pure function of its inputs.
pub fn generate(
    config: AudienceConfig,
    seed: u64,
    count: usize,
    window: TimeWindow,
) -> OpportunityBatch {
    AudienceGenerator::new(config, seed).batch(count, window)
}

/// `1 + amplitude * sin(2π h / 24)` for the hour of day `h` of `ts`.
pub fn diurnal_factor(ts: Timestamp, amplitude: f64) -> f64 {
    let hour = (ts / SECONDS_PER_HOUR) % 24;
    1.0 + amplitude * (2.0 * PI * hour as f64 / 24.0).sin()
}
