//! Per-seller running ledger.
//!
//! The ledger holds the additive counters a seller accumulates within a block
//! and the current shading coefficient. Policies read it; only the owning
//! [`SellerAgent`](crate::SellerAgent) writes it.

use types::SellerCounters;

/// Shading is kept inside `[MIN_SHADING, MAX_SHADING]` at all times.
pub const MIN_SHADING: f64 = 0.01;
pub const MAX_SHADING: f64 = 5.0;

pub fn clamp_shading(shading: f64) -> f64 {
    shading.clamp(MIN_SHADING, MAX_SHADING)
}

/// What happened to a seller on one opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Outcome {
    pub clicked: bool,
    pub converted: bool,
    /// Amount charged, `price × clicked`.
    pub price_paid: f64,
}

impl Outcome {
    /// Outcome of a seller that did not win a slot.
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellerLedger {
    daily_budget: f64,
    shading: f64,
    counters: SellerCounters,
}

impl SellerLedger {
    pub fn new(daily_budget: f64, shading: f64) -> Self {
        Self {
            daily_budget,
            shading: clamp_shading(shading),
            counters: SellerCounters::default(),
        }
    }

    pub fn daily_budget(&self) -> f64 {
        self.daily_budget
    }

    pub fn shading(&self) -> f64 {
        self.shading
    }

    pub fn set_shading(&mut self, shading: f64) {
        self.shading = clamp_shading(shading);
    }

    pub fn spend(&self) -> f64 {
        self.counters.spend
    }

    pub fn revenue(&self) -> f64 {
        self.counters.revenue
    }

    pub fn counters(&self) -> SellerCounters {
        self.counters
    }

    /// Fraction of the daily budget spent so far.
    pub fn spend_fraction(&self) -> f64 {
        self.counters.spend / self.daily_budget
    }

    /// Running `revenue / spend`, 0 before any spend.
    pub fn running_roas(&self) -> f64 {
        if self.counters.spend > 0.0 {
            self.counters.revenue / self.counters.spend
        } else {
            0.0
        }
    }

    pub fn record(&mut self, outcome: &Outcome, value_per_conversion: f64) {
        self.counters += SellerCounters {
            spend: outcome.price_paid,
            clicks: u64::from(outcome.clicked),
            conversions: u64::from(outcome.converted),
            revenue: if outcome.converted { value_per_conversion } else { 0.0 },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shading_clamped_at_construction() {
        assert_eq!(SellerLedger::new(1.0, 10.0).shading(), MAX_SHADING);
        assert_eq!(SellerLedger::new(1.0, 0.0).shading(), MIN_SHADING);
    }

    #[test]
    fn test_record_outcome() {
        let mut ledger = SellerLedger::new(100.0, 0.8);
        ledger.record(
            &Outcome {
                clicked: true,
                converted: true,
                price_paid: 2.0,
            },
            20.0,
        );
        ledger.record(&Outcome::none(), 20.0);

        let c = ledger.counters();
        assert_eq!(c.clicks, 1);
        assert_eq!(c.conversions, 1);
        assert_eq!(c.spend, 2.0);
        assert_eq!(c.revenue, 20.0);
        assert_eq!(ledger.running_roas(), 10.0);
        assert_eq!(ledger.spend_fraction(), 0.02);
    }
}
