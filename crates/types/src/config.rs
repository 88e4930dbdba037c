//! Run configuration: the world (traffic, mechanism, regulation) and the sellers.
//!
//! All types deserialize from the JSON run document. Defaults mirror a small
//! three-slot GSP marketplace. Names for mechanisms, policies and metric modes
//! are closed sets; an unknown name fails at deserialization.
//!
//! `SimConfig::validate` must pass before any block is simulated.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ids::{SellerId, Timestamp};

/// Seconds per hour, used to convert the horizon.
pub const SECONDS_PER_HOUR: u64 = 3_600;

// =============================================================================
// Closed selectors
// =============================================================================

/// Pricing rule applied after allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKind {
    /// Winners pay their own bid.
    FirstPrice,
    /// Winners pay the next-ranked score divided by their own quality.
    #[default]
    Gsp,
    /// Winners pay the externality imposed on lower-ranked winners.
    Vcg,
}

impl MechanismKind {
    pub const ALL: [MechanismKind; 3] = [
        MechanismKind::FirstPrice,
        MechanismKind::Gsp,
        MechanismKind::Vcg,
    ];

    /// Inverse of [`as_str`](Self::as_str).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstPrice => "first_price",
            Self::Gsp => "gsp",
            Self::Vcg => "vcg",
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adaptation rule a seller applies to its shading after every opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Aggressive,
    RoiDriven,
    Conservative,
    RiskAverse,
    Exploratory,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Aggressive,
        PolicyKind::RoiDriven,
        PolicyKind::Conservative,
        PolicyKind::RiskAverse,
        PolicyKind::Exploratory,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::RoiDriven => "roi_driven",
            Self::Conservative => "conservative",
            Self::RiskAverse => "risk_averse",
            Self::Exploratory => "exploratory",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How return on ad spend is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoasMode {
    /// `revenue / spend`.
    #[default]
    ValueOverSpend,
    /// `(revenue - spend) / spend`.
    ProfitOverSpend,
}

impl RoasMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValueOverSpend => "value_over_spend",
            Self::ProfitOverSpend => "profit_over_spend",
        }
    }
}

/// How return on cost of sales is reported.
///
/// Only one formula exists; the selector is kept so run documents stay explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RocsMode {
    /// `(revenue * (1 - cogs_ratio) - spend) / spend`.
    #[default]
    RevenueMinusCogsOverSpend,
}

impl RocsMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RevenueMinusCogsOverSpend => "revenue_minus_cogs_over_spend",
        }
    }
}

// =============================================================================
// World
// =============================================================================

/// Eligibility thresholds and the reserve price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegulationConfig {
    /// Sellers with a quality score below this are screened out.
    pub min_quality: f64,
    /// Sellers bidding below this are screened out.
    pub min_bid: f64,
    /// Every clearing price is floored at this cost per click.
    pub reserve_cpc: f64,
}

/// Ratio metric selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MetricsConfig {
    pub roas_mode: RoasMode,
    pub rocs_mode: RocsMode,
}

/// Traffic, mechanism and regulation settings shared by every block of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Start of the horizon (unix seconds).
    pub start_ts: Timestamp,
    /// Length of the horizon in hours.
    pub horizon_hours: u64,
    /// Total opportunities in the run.
    pub opportunities: u64,
    /// Opportunities per block.
    pub batch_size: u64,
    /// Number of ranked slots `k`.
    pub slots: usize,
    /// Visibility multiplier per slot, non-increasing, at least `slots` long.
    pub slot_multipliers: Vec<f64>,
    pub mechanism: MechanismKind,
    /// Dimensionality of user and seller embeddings.
    pub embedding_dim: usize,
    pub base_ctr: f64,
    pub base_cvr: f64,
    /// Amplitude of the 24h sinusoidal CTR modulation.
    pub diurnal_amplitude: f64,
    /// Standard deviation of Gaussian noise on raw interest scores.
    pub noise_std: f64,
    pub regulation: RegulationConfig,
    pub metrics: MetricsConfig,
    /// Base seed for block seeds. Falls back to `start_ts`.
    pub seed: Option<u64>,
    /// Opportunities between history snapshots.
    pub history_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            start_ts: 0,
            horizon_hours: 24,
            opportunities: 100_000,
            batch_size: 100_000,
            slots: 3,
            slot_multipliers: vec![1.0, 0.7, 0.5],
            mechanism: MechanismKind::Gsp,
            embedding_dim: 16,
            base_ctr: 0.02,
            base_cvr: 0.02,
            diurnal_amplitude: 0.2,
            noise_std: 0.1,
            regulation: RegulationConfig::default(),
            metrics: MetricsConfig::default(),
            seed: None,
            history_interval: 1_000,
        }
    }
}

impl WorldConfig {
    /// Horizon length in seconds.
    pub fn horizon_secs(&self) -> u64 {
        self.horizon_hours * SECONDS_PER_HOUR
    }

    /// Seed that block 0 uses; block `i` uses `base_seed() + i`.
    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or(self.start_ts)
    }

    /// Number of blocks needed to cover all opportunities.
    pub fn block_count(&self) -> u64 {
        self.opportunities.div_ceil(self.batch_size.max(1))
    }

    /// The first `slots` multipliers.
    pub fn active_multipliers(&self) -> &[f64] {
        &self.slot_multipliers[..self.slots.min(self.slot_multipliers.len())]
    }

    pub fn with_mechanism(mut self, mechanism: MechanismKind) -> Self {
        self.mechanism = mechanism;
        self
    }

    pub fn with_slots(mut self, slots: usize, multipliers: Vec<f64>) -> Self {
        self.slots = slots;
        self.slot_multipliers = multipliers;
        self
    }

    pub fn with_opportunities(mut self, opportunities: u64, batch_size: u64) -> Self {
        self.opportunities = opportunities;
        self.batch_size = batch_size;
        self
    }

    pub fn with_regulation(mut self, regulation: RegulationConfig) -> Self {
        self.regulation = regulation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots == 0 {
            return Err(ConfigError::NoSlots);
        }
        if self.slot_multipliers.len() < self.slots {
            return Err(ConfigError::SlotMultipliers {
                slots: self.slots,
                provided: self.slot_multipliers.len(),
            });
        }
        let active = self.active_multipliers();
        if active.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(ConfigError::NegativeSlotMultiplier);
        }
        if let Some(pos) = active.windows(2).position(|w| w[1] > w[0]) {
            return Err(ConfigError::IncreasingSlotMultipliers { position: pos + 1 });
        }
        if self.opportunities == 0 {
            return Err(ConfigError::ZeroField("opportunities"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroField("batch_size"));
        }
        if self.horizon_hours == 0 {
            return Err(ConfigError::ZeroField("horizon_hours"));
        }
        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroField("embedding_dim"));
        }
        if self.history_interval == 0 {
            return Err(ConfigError::ZeroField("history_interval"));
        }
        for (name, rate) in [("base_ctr", self.base_ctr), ("base_cvr", self.base_cvr)] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::OutOfRange {
                    field: name,
                    value: rate,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.diurnal_amplitude) {
            return Err(ConfigError::OutOfRange {
                field: "diurnal_amplitude",
                value: self.diurnal_amplitude,
            });
        }
        if !(self.noise_std >= 0.0 && self.noise_std.is_finite()) {
            return Err(ConfigError::OutOfRange {
                field: "noise_std",
                value: self.noise_std,
            });
        }
        let reg = &self.regulation;
        for (name, value) in [
            ("min_quality", reg.min_quality),
            ("min_bid", reg.min_bid),
            ("reserve_cpc", reg.reserve_cpc),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::OutOfRange { field: name, value });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Sellers
// =============================================================================

/// Static description of one seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerConfig {
    pub id: SellerId,
    #[serde(default = "default_brand")]
    pub brand: String,
    pub daily_budget: f64,
    pub value_per_conversion: f64,
    #[serde(default = "default_cogs_ratio")]
    pub cogs_ratio: f64,
    /// Initial shading coefficient.
    #[serde(default = "default_shading")]
    pub base_bid_shading: f64,
    pub policy: PolicyKind,
    #[serde(default)]
    pub seed: u64,
}

fn default_brand() -> String {
    "generic".to_string()
}

fn default_cogs_ratio() -> f64 {
    0.5
}

fn default_shading() -> f64 {
    0.8
}

impl SellerConfig {
    pub fn new(
        id: impl Into<SellerId>,
        daily_budget: f64,
        value_per_conversion: f64,
        policy: PolicyKind,
    ) -> Self {
        Self {
            id: id.into(),
            brand: default_brand(),
            daily_budget,
            value_per_conversion,
            cogs_ratio: default_cogs_ratio(),
            base_bid_shading: default_shading(),
            policy,
            seed: 0,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_shading(mut self, shading: f64) -> Self {
        self.base_bid_shading = shading;
        self
    }

    pub fn with_cogs_ratio(mut self, cogs_ratio: f64) -> Self {
        self.cogs_ratio = cogs_ratio;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidSeller {
            id: self.id.clone(),
            reason,
        };
        if !(self.daily_budget > 0.0 && self.daily_budget.is_finite()) {
            return Err(invalid("daily_budget must be positive"));
        }
        if !(self.value_per_conversion > 0.0 && self.value_per_conversion.is_finite()) {
            return Err(invalid("value_per_conversion must be positive"));
        }
        if !(0.0..=1.0).contains(&self.cogs_ratio) {
            return Err(invalid("cogs_ratio must be within [0, 1]"));
        }
        if !(self.base_bid_shading > 0.0 && self.base_bid_shading.is_finite()) {
            return Err(invalid("base_bid_shading must be positive"));
        }
        Ok(())
    }
}

// =============================================================================
// Run document
// =============================================================================

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub sellers: Vec<SellerConfig>,
}

impl SimConfig {
    pub fn new(world: WorldConfig, sellers: Vec<SellerConfig>) -> Self {
        Self { world, sellers }
    }

    /// Check every constraint that would otherwise surface mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        if self.sellers.is_empty() {
            return Err(ConfigError::NoSellers);
        }
        let mut seen = HashSet::with_capacity(self.sellers.len());
        for seller in &self.sellers {
            seller.validate()?;
            if !seen.insert(&seller.id) {
                return Err(ConfigError::DuplicateSeller(seller.id.clone()));
            }
        }
        Ok(())
    }
}
