//! Slot allocation and pricing.
//!
//! Every mechanism shares one allocation: sellers are ranked by score
//! `s_i = b_i · q_i`, descending, ties broken by seller index, and only strictly
//! positive scores can win. Pricing rules differ:
//!
//! - **First-price**: each winner pays its own bid.
//! - **GSP**: rank `i` pays the next rank's score divided by its own quality;
//!   the lowest winner pays 0.
//! - **VCG**: rank `i` pays the externality it imposes on lower ranks,
//!   `Σ_{j>i} s_j · (m[j-1] - m[j]) / q_i`.
//!
//! Prices here are unfloored; the [`Regulator`](crate::Regulator) applies the reserve.

use smallvec::SmallVec;
use types::{MechanismKind, WorldConfig};

use crate::error::{Result, SimCoreError};

/// Lower bound substituted for zero qualities and zero CTR maxima.
pub const EPSILON: f64 = 1e-9;

/// Winning seller indices in rank order.
pub type Winners = SmallVec<[usize; 4]>;
/// Per-winner clearing prices, aligned with [`Winners`].
pub type Prices = SmallVec<[f64; 4]>;

/// Outcome of one auction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuctionResult {
    pub winners: Winners,
    pub prices: Prices,
}

impl AuctionResult {
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    /// `(rank, seller, price)` for each winner.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.winners
            .iter()
            .zip(&self.prices)
            .enumerate()
            .map(|(rank, (&seller, &price))| (rank, seller, price))
    }
}

/// A configured pricing rule over `slots` ranked positions.
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionMechanism {
    kind: MechanismKind,
    slots: usize,
    multipliers: Vec<f64>,
}

impl AuctionMechanism {
    /// Build a mechanism. `multipliers` must cover every slot.
    pub fn new(kind: MechanismKind, slots: usize, multipliers: &[f64]) -> Result<Self> {
        if multipliers.len() < slots {
            return Err(SimCoreError::MissingMultipliers {
                slots,
                provided: multipliers.len(),
            });
        }
        Ok(Self {
            kind,
            slots,
            multipliers: multipliers[..slots].to_vec(),
        })
    }

    pub fn from_world(world: &WorldConfig) -> Result<Self> {
        Self::new(world.mechanism, world.slots, &world.slot_multipliers)
    }

    pub fn kind(&self) -> MechanismKind {
        self.kind
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Visibility multiplier of each slot, best first.
    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    /// Allocate and price one opportunity.
    pub fn run(&self, bids: &[f64], qualities: &[f64]) -> Result<AuctionResult> {
        if bids.len() != qualities.len() {
            return Err(SimCoreError::LengthMismatch {
                bids: bids.len(),
                qualities: qualities.len(),
            });
        }
        let scores: Vec<f64> = bids.iter().zip(qualities).map(|(b, q)| b * q).collect();
        let winners = allocate(&scores, self.slots);
        let prices = match self.kind {
            MechanismKind::FirstPrice => prices_first_price(bids, &winners),
            MechanismKind::Gsp => prices_gsp(&scores, qualities, &winners),
            MechanismKind::Vcg => prices_vcg(&scores, qualities, &winners, &self.multipliers),
        };
        Ok(AuctionResult { winners, prices })
    }
}

/// Top `k` indices with strictly positive score, by descending score then index.
pub fn allocate(scores: &[f64], k: usize) -> Winners {
    let mut ranked: Vec<usize> = (0..scores.len()).filter(|&i| scores[i] > 0.0).collect();
    // Stable sort keeps ascending index order among equal scores.
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    ranked.into_iter().take(k).collect()
}

pub fn prices_first_price(bids: &[f64], winners: &[usize]) -> Prices {
    winners.iter().map(|&i| bids[i]).collect()
}

pub fn prices_gsp(scores: &[f64], qualities: &[f64], winners: &[usize]) -> Prices {
    winners
        .iter()
        .enumerate()
        .map(|(rank, &i)| match winners.get(rank + 1) {
            Some(&next) => scores[next] / qualities[i].max(EPSILON),
            None => 0.0,
        })
        .collect()
}

pub fn prices_vcg(
    scores: &[f64],
    qualities: &[f64],
    winners: &[usize],
    multipliers: &[f64],
) -> Prices {
    winners
        .iter()
        .enumerate()
        .map(|(rank, &i)| {
            let externality: f64 = winners
                .iter()
                .enumerate()
                .skip(rank + 1)
                .map(|(j, &w)| scores[w] * (multipliers[j - 1] - multipliers[j]))
                .sum();
            externality / qualities[i].max(EPSILON)
        })
        .collect()
}

/// Normalize predicted CTRs into quality scores: `ctr / max(ctr)`, or `ctr + ε`
/// when every CTR is zero.
pub fn quality_scores(ctr: &[f64]) -> Vec<f64> {
    let max = ctr.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        ctr.iter().map(|c| c / max).collect()
    } else {
        ctr.iter().map(|c| c + EPSILON).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mechanism(kind: MechanismKind, slots: usize) -> AuctionMechanism {
        AuctionMechanism::new(kind, slots, &[1.0, 0.7, 0.5, 0.3]).unwrap()
    }

    #[test]
    fn test_allocate_ranks_by_score() {
        let winners = allocate(&[1.0, 3.0, 2.0, 0.5], 3);
        assert_eq!(winners.as_slice(), &[1, 2, 0]);
    }

    #[test]
    fn test_allocate_ties_by_index() {
        let winners = allocate(&[2.0, 2.0, 2.0], 2);
        assert_eq!(winners.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_allocate_skips_zero_scores() {
        let winners = allocate(&[0.0, 1.0, 0.0], 3);
        assert_eq!(winners.as_slice(), &[1]);
        assert!(allocate(&[0.0, 0.0], 2).is_empty());
    }

    #[test]
    fn test_gsp_two_sellers_one_slot() {
        // Scores [10, 6]: the winner pays 6 / q_winner.
        let bids = [20.0, 8.0];
        let qs = [0.5, 0.75];
        let result = mechanism(MechanismKind::Gsp, 1).run(&bids, &qs).unwrap();
        assert_eq!(result.winners.as_slice(), &[0]);
        assert!((result.prices[0] - 6.0 / 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gsp_last_winner_pays_zero() {
        let result = mechanism(MechanismKind::Gsp, 2).run(&[4.0, 2.0], &[1.0, 1.0]).unwrap();
        assert_eq!(result.prices.as_slice(), &[2.0, 0.0]);
    }

    #[test]
    fn test_gsp_top_price_within_bid() {
        let bids = [3.0, 5.0, 1.0, 4.0];
        let qs = [0.9, 0.4, 1.0, 0.6];
        let result = mechanism(MechanismKind::Gsp, 3).run(&bids, &qs).unwrap();
        for (_, seller, price) in result.iter() {
            assert!(price <= bids[seller] + 1e-12);
        }
    }

    #[test]
    fn test_first_price_pays_bid() {
        let result = mechanism(MechanismKind::FirstPrice, 2)
            .run(&[1.5, 2.5], &[1.0, 1.0])
            .unwrap();
        assert_eq!(result.winners.as_slice(), &[1, 0]);
        assert_eq!(result.prices.as_slice(), &[2.5, 1.5]);
    }

    #[test]
    fn test_vcg_externality() {
        // Scores [6, 4, 2], multipliers [1.0, 0.7, 0.5].
        let result = mechanism(MechanismKind::Vcg, 3)
            .run(&[6.0, 4.0, 2.0], &[1.0, 1.0, 1.0])
            .unwrap();
        let expected_top = 4.0 * 0.3 + 2.0 * 0.2;
        assert!((result.prices[0] - expected_top).abs() < 1e-12);
        assert!((result.prices[1] - 2.0 * 0.2).abs() < 1e-12);
        assert_eq!(result.prices[2], 0.0);
    }

    #[test]
    fn test_vcg_prices_non_negative() {
        let bids = [0.3, 2.0, 1.1, 0.9, 5.0];
        let qs = [1.0, 0.2, 0.8, 0.5, 0.1];
        let result = mechanism(MechanismKind::Vcg, 4).run(&bids, &qs).unwrap();
        assert!(result.prices.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_length_mismatch() {
        let err = mechanism(MechanismKind::Gsp, 1).run(&[1.0], &[1.0, 0.5]).unwrap_err();
        assert_eq!(err, SimCoreError::LengthMismatch { bids: 1, qualities: 2 });
    }

    #[test]
    fn test_missing_multipliers() {
        assert!(AuctionMechanism::new(MechanismKind::Vcg, 3, &[1.0]).is_err());
    }

    #[test]
    fn test_quality_scores() {
        assert_eq!(quality_scores(&[0.01, 0.02]), vec![0.5, 1.0]);
        assert!(quality_scores(&[0.0, 0.0]).iter().all(|&q| q == EPSILON));
    }
}
