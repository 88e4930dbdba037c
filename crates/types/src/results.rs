//! Block and run result rows.
//!
//! A block emits one [`SellerTotals`] per seller, one [`BlockMetrics`] row and a
//! [`HistoryPoint`] series. The aggregator folds blocks into a [`RunResult`].
//! Ratio columns are derived values and are recomputed whenever counters change.

use derive_more::{Add, AddAssign};
use serde::{Deserialize, Serialize};

use crate::config::{MechanismKind, MetricsConfig, PolicyKind};
use crate::ids::{SellerId, Timestamp};
use crate::metrics;

// =============================================================================
// Seller rows
// =============================================================================

/// Additive per-seller counters. These are the only seller values summed across blocks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Add, AddAssign)]
pub struct SellerCounters {
    pub spend: f64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
}

/// Totals for one seller over a block or a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerTotals {
    pub seller_id: SellerId,
    pub brand: String,
    pub policy: PolicyKind,
    pub cogs_ratio: f64,
    #[serde(flatten)]
    pub counters: SellerCounters,
    pub roas: f64,
    pub rocs: f64,
    pub surplus: f64,
}

impl SellerTotals {
    /// Build a row and derive its ratio columns from `counters`.
    pub fn new(
        seller_id: SellerId,
        brand: String,
        policy: PolicyKind,
        cogs_ratio: f64,
        counters: SellerCounters,
        modes: MetricsConfig,
    ) -> Self {
        let mut row = Self {
            seller_id,
            brand,
            policy,
            cogs_ratio,
            counters,
            roas: 0.0,
            rocs: 0.0,
            surplus: 0.0,
        };
        row.rederive(modes);
        row
    }

    /// Recompute ROAS, ROCS and surplus from the current counters.
    pub fn rederive(&mut self, modes: MetricsConfig) {
        let c = &self.counters;
        self.roas = metrics::roas(modes.roas_mode, c.revenue, c.spend);
        self.rocs = metrics::rocs(modes.rocs_mode, c.revenue, c.spend, self.cogs_ratio);
        self.surplus = metrics::surplus(c.revenue, c.spend);
    }
}

/// Periodic snapshot of a seller's adaptive state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub seller_id: SellerId,
    pub policy: PolicyKind,
    pub elapsed_frac: f64,
    pub shading: f64,
    pub spend: f64,
    /// Running `revenue / spend` (0 without spend).
    pub roas: f64,
    pub remaining_budget: f64,
    /// Campaign pacing hint at `elapsed_frac`.
    pub pacing: f64,
}

// =============================================================================
// Block / run rows
// =============================================================================

/// Block-level aggregates.
///
/// `user_experience_sum` is the sum over opportunities of the mean shown CTR;
/// `user_experience` is that sum divided by `opportunities`. Only the sum is
/// reduced across blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMetrics {
    pub opportunities: u64,
    pub platform_revenue: f64,
    pub social_welfare: f64,
    pub user_experience_sum: f64,
    pub user_experience: f64,
    pub mechanism: MechanismKind,
    pub slots: usize,
    pub reserve_cpc: f64,
    pub metric_modes: MetricsConfig,
    pub ts_start: Timestamp,
    pub ts_end: Timestamp,
}

/// Output of simulating one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResult {
    /// Offset of the block's first opportunity within the run.
    pub start_offset: u64,
    pub seed: u64,
    pub sellers: Vec<SellerTotals>,
    pub metrics: BlockMetrics,
    pub history: Vec<HistoryPoint>,
}

impl BlockResult {
    /// Total spend across sellers; equals `metrics.platform_revenue` up to rounding.
    pub fn total_spend(&self) -> f64 {
        self.sellers.iter().map(|s| s.counters.spend).sum()
    }
}

/// Run-level aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub blocks: u64,
    pub opportunities: u64,
    pub platform_revenue: f64,
    pub social_welfare: f64,
    pub user_experience_sum: f64,
    /// Opportunity-weighted mean shown CTR.
    pub user_experience: f64,
    pub mechanism: MechanismKind,
    pub slots: usize,
    pub reserve_cpc: f64,
    pub metric_modes: MetricsConfig,
    pub ts_start: Timestamp,
    pub ts_end: Timestamp,
}

/// Combined result of all blocks of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Seller totals ordered by seller id.
    pub sellers: Vec<SellerTotals>,
    pub metrics: RunMetrics,
}

impl RunResult {
    pub fn seller(&self, id: &SellerId) -> Option<&SellerTotals> {
        self.sellers.iter().find(|s| &s.seller_id == id)
    }
}

/// Everything a finished run produces: combined totals plus the history series
/// of every block, concatenated in block order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub run: RunResult,
    pub history: Vec<HistoryPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoasMode;

    #[test]
    fn test_counters_add() {
        let a = SellerCounters {
            spend: 1.5,
            clicks: 3,
            conversions: 1,
            revenue: 10.0,
        };
        let mut b = a;
        b += a;
        assert_eq!(b, a + a);
        assert_eq!(b.clicks, 6);
        assert_eq!(b.spend, 3.0);
    }

    #[test]
    fn test_totals_derive_ratios() {
        let counters = SellerCounters {
            spend: 10.0,
            clicks: 5,
            conversions: 2,
            revenue: 40.0,
        };
        let row = SellerTotals::new(
            SellerId::from("s"),
            "generic".into(),
            PolicyKind::Aggressive,
            0.5,
            counters,
            MetricsConfig::default(),
        );
        assert_eq!(row.roas, 4.0);
        assert!((row.rocs - 1.0).abs() < 1e-12);
        assert_eq!(row.surplus, 30.0);

        let profit = MetricsConfig {
            roas_mode: RoasMode::ProfitOverSpend,
            ..Default::default()
        };
        let mut row = row;
        row.rederive(profit);
        assert_eq!(row.roas, 3.0);
    }

    #[test]
    fn test_totals_serialize_flat() {
        let row = SellerTotals::new(
            SellerId::from("s"),
            "b".into(),
            PolicyKind::RiskAverse,
            0.3,
            SellerCounters::default(),
            MetricsConfig::default(),
        );
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["seller_id"], "s");
        assert_eq!(json["policy"], "risk_averse");
        assert_eq!(json["clicks"], 0);
        assert_eq!(json["roas"], 0.0);
    }
}
