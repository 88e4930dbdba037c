//! Configuration for opportunity generation.

use serde::{Deserialize, Serialize};
use types::{Timestamp, WorldConfig};

/// Traffic parameters consumed by the generator and the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudienceConfig {
    /// Dimensionality of user and seller embeddings.
    pub embedding_dim: usize,
    pub base_ctr: f64,
    pub base_cvr: f64,
    /// Amplitude of the 24h sinusoid applied to CTR.
    pub diurnal_amplitude: f64,
    /// Standard deviation of Gaussian noise on raw interest scores (0 disables).
    pub noise_std: f64,
}

impl AudienceConfig {
    pub fn from_world(world: &WorldConfig) -> Self {
        Self {
            embedding_dim: world.embedding_dim,
            base_ctr: world.base_ctr,
            base_cvr: world.base_cvr,
            diurnal_amplitude: world.diurnal_amplitude,
            noise_std: world.noise_std,
        }
    }
}

impl Default for AudienceConfig {
    fn default() -> Self {
        Self::from_world(&WorldConfig::default())
    }
}

/// Half-open interval `[start, start + span_secs)` that timestamps are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub span_secs: u64,
}

impl TimeWindow {
    pub fn new(start: Timestamp, span_secs: u64) -> Self {
        Self { start, span_secs }
    }

    pub fn from_hours(start: Timestamp, hours: u64) -> Self {
        Self::new(start, hours * types::SECONDS_PER_HOUR)
    }

    /// Exclusive end of the window.
    pub fn end(&self) -> Timestamp {
        self.start + self.span_secs
    }
}
