//! Marketplace rules applied around each auction.

use types::RegulationConfig;

/// Eligibility screen and reserve floor.
///
/// An ineligible seller keeps its position in the bid and quality vectors with
/// both entries zeroed, so its score is 0 and allocation skips it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Regulator {
    min_quality: f64,
    min_bid: f64,
    reserve_cpc: f64,
}

impl Regulator {
    pub fn new(config: RegulationConfig) -> Self {
        Self {
            min_quality: config.min_quality,
            min_bid: config.min_bid,
            reserve_cpc: config.reserve_cpc,
        }
    }

    pub fn reserve_cpc(&self) -> f64 {
        self.reserve_cpc
    }

    pub fn is_eligible(&self, bid: f64, quality: f64) -> bool {
        quality >= self.min_quality && bid >= self.min_bid
    }

    /// Zero the bid and quality of every ineligible seller in place.
    pub fn screen(&self, bids: &mut [f64], qualities: &mut [f64]) {
        for (b, q) in bids.iter_mut().zip(qualities.iter_mut()) {
            if !self.is_eligible(*b, *q) {
                *b = 0.0;
                *q = 0.0;
            }
        }
    }

    /// Raise every price to at least the reserve.
    pub fn floor_prices(&self, prices: &mut [f64]) {
        for p in prices {
            *p = p.max(self.reserve_cpc);
        }
    }
}

impl From<RegulationConfig> for Regulator {
    fn from(config: RegulationConfig) -> Self {
        Self::new(config)
    }
}
