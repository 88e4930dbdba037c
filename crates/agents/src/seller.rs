//! Seller agent: valuation, bidding and per-opportunity adaptation.

use rand::rngs::StdRng;
use types::{HistoryPoint, MetricsConfig, PolicyKind, SellerConfig, SellerId, SellerTotals};

use crate::campaign::Campaign;
use crate::policy::BiddingPolicy;
use crate::state::{Outcome, SellerLedger};

/// Name of the single campaign every seller runs.
pub const DEFAULT_CAMPAIGN: &str = "default";

/// One advertiser inside a block.
///
/// Built fresh for every block from its [`SellerConfig`]; nothing carries over
/// between blocks.
#[derive(Debug, Clone)]
pub struct SellerAgent {
    id: SellerId,
    brand: String,
    policy: PolicyKind,
    value_per_conversion: f64,
    cogs_ratio: f64,
    embedding: Vec<f64>,
    campaign: Campaign,
    ledger: SellerLedger,
    rng: StdRng,
}

impl SellerAgent {
    pub fn new(config: &SellerConfig, embedding: Vec<f64>, rng: StdRng) -> Self {
        let ledger = SellerLedger::new(config.daily_budget, config.base_bid_shading);
        Self {
            id: config.id.clone(),
            brand: config.brand.clone(),
            policy: config.policy,
            value_per_conversion: config.value_per_conversion,
            cogs_ratio: config.cogs_ratio,
            embedding,
            campaign: Campaign::new(DEFAULT_CAMPAIGN, config.daily_budget),
            ledger,
            rng,
        }
    }

    pub fn id(&self) -> &SellerId {
        &self.id
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    pub fn value_per_conversion(&self) -> f64 {
        self.value_per_conversion
    }

    pub fn embedding(&self) -> &[f64] {
        &self.embedding
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn ledger(&self) -> &SellerLedger {
        &self.ledger
    }

    pub fn shading(&self) -> f64 {
        self.ledger.shading()
    }

    /// Shaded expected value of one opportunity, or `None` once the budget is gone.
    ///
    /// `ctr` and `elapsed` are accepted for policies that may price on them;
    /// the current valuation depends on `cvr` only.
    pub fn bid(&self, _ctr: f64, cvr: f64, _elapsed: f64) -> Option<f64> {
        if self.campaign.is_exhausted() {
            return None;
        }
        Some(self.ledger.shading() * self.value_per_conversion * cvr)
    }

    /// Record the outcome of one opportunity and update shading.
    pub fn observe_and_adapt(
        &mut self,
        clicked: bool,
        converted: bool,
        price_paid: f64,
        elapsed: f64,
    ) {
        let outcome = Outcome {
            clicked,
            converted: converted && clicked,
            price_paid,
        };
        self.ledger.record(&outcome, self.value_per_conversion);
        self.campaign.charge(price_paid);
        let next = self
            .policy
            .next_shading(&self.ledger, elapsed, &outcome, &mut self.rng);
        self.ledger.set_shading(next);
    }

    pub fn snapshot(&self, elapsed: f64) -> HistoryPoint {
        HistoryPoint {
            seller_id: self.id.clone(),
            policy: self.policy,
            elapsed_frac: elapsed,
            shading: self.ledger.shading(),
            spend: self.ledger.spend(),
            roas: self.ledger.running_roas(),
            remaining_budget: self.campaign.remaining_budget(),
            pacing: self.campaign.pacing_multiplier(elapsed),
        }
    }

    pub fn totals(&self, modes: MetricsConfig) -> SellerTotals {
        SellerTotals::new(
            self.id.clone(),
            self.brand.clone(),
            self.policy,
            self.cogs_ratio,
            self.ledger.counters(),
            modes,
        )
    }
}
