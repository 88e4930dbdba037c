//! Bid-shading policies.
//!
//! Each [`PolicyKind`] is a pure transition from the seller's ledger and the
//! latest outcome to the next shading coefficient:
//!
//! | policy        | rule                                                          |
//! |---------------|---------------------------------------------------------------|
//! | aggressive    | spend fraction behind `elapsed + 0.05`: `× 1.0001`            |
//! | roi_driven    | running ROAS below 4.0: `× 0.9999`, otherwise `× 1.00005`     |
//! | conservative  | spend fraction ahead of `elapsed`: `× 0.9999`, else `× 1.00002` |
//! | risk_averse   | paid without converting: `× 0.9999`; converted: `× 1.0002`    |
//! | exploratory   | `× uniform(0.9998, 1.0002)`                                   |
//!
//! The result is always clamped to `[MIN_SHADING, MAX_SHADING]`.

use rand::Rng;
use types::PolicyKind;

use crate::state::{Outcome, SellerLedger, clamp_shading};

/// Lead the aggressive policy keeps over proportional spend.
pub const AGGRESSIVE_LEAD: f64 = 0.05;
pub const AGGRESSIVE_STEP: f64 = 1.0001;

pub const ROI_TARGET: f64 = 4.0;
pub const ROI_DOWN: f64 = 0.9999;
pub const ROI_UP: f64 = 1.000_05;

pub const CONSERVATIVE_DOWN: f64 = 0.9999;
pub const CONSERVATIVE_UP: f64 = 1.000_02;

pub const RISK_DOWN: f64 = 0.9999;
pub const RISK_UP: f64 = 1.0002;

pub const EXPLORE_LOW: f64 = 0.9998;
pub const EXPLORE_HIGH: f64 = 1.0002;

/// Spend below this counts as no spend for the ROI rule.
const SPEND_EPSILON: f64 = 1e-12;

/// Shading transition applied after every opportunity.
pub trait BiddingPolicy {
    /// Next shading given the ledger after `outcome` was recorded.
    fn next_shading(
        &self,
        ledger: &SellerLedger,
        elapsed: f64,
        outcome: &Outcome,
        rng: &mut impl Rng,
    ) -> f64;
}

impl BiddingPolicy for PolicyKind {
    fn next_shading(
        &self,
        ledger: &SellerLedger,
        elapsed: f64,
        outcome: &Outcome,
        rng: &mut impl Rng,
    ) -> f64 {
        let factor = match self {
            PolicyKind::Aggressive => {
                if ledger.spend_fraction() < elapsed + AGGRESSIVE_LEAD {
                    AGGRESSIVE_STEP
                } else {
                    1.0
                }
            }
            PolicyKind::RoiDriven => {
                let roas = if ledger.spend() < SPEND_EPSILON {
                    ROI_TARGET
                } else {
                    ledger.revenue() / ledger.spend().max(1.0)
                };
                if roas < ROI_TARGET { ROI_DOWN } else { ROI_UP }
            }
            PolicyKind::Conservative => {
                if ledger.spend_fraction() > elapsed {
                    CONSERVATIVE_DOWN
                } else {
                    CONSERVATIVE_UP
                }
            }
            PolicyKind::RiskAverse => {
                if outcome.price_paid > 0.0 && !outcome.converted {
                    RISK_DOWN
                } else if outcome.converted {
                    RISK_UP
                } else {
                    1.0
                }
            }
            PolicyKind::Exploratory => rng.random_range(EXPLORE_LOW..EXPLORE_HIGH),
        };
        clamp_shading(ledger.shading() * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MAX_SHADING, MIN_SHADING};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn paid(price: f64, converted: bool) -> Outcome {
        Outcome {
            clicked: price > 0.0,
            converted,
            price_paid: price,
        }
    }

    fn ledger_with(spend: f64, revenue_convs: u32, vpc: f64) -> SellerLedger {
        let mut ledger = SellerLedger::new(100.0, 1.0);
        ledger.record(&paid(spend, false), vpc);
        for _ in 0..revenue_convs {
            ledger.record(&paid(0.0, true), vpc);
        }
        ledger
    }

    fn step(policy: PolicyKind, ledger: &SellerLedger, elapsed: f64, outcome: &Outcome) -> f64 {
        let mut rng = StdRng::seed_from_u64(0);
        policy.next_shading(ledger, elapsed, outcome, &mut rng)
    }

    #[test]
    fn test_aggressive_pushes_when_behind() {
        let behind = ledger_with(10.0, 0, 1.0);
        assert_eq!(step(PolicyKind::Aggressive, &behind, 0.5, &Outcome::none()), AGGRESSIVE_STEP);

        let ahead = ledger_with(60.0, 0, 1.0);
        assert_eq!(step(PolicyKind::Aggressive, &ahead, 0.5, &Outcome::none()), 1.0);
    }

    #[test]
    fn test_roi_driven() {
        let fresh = SellerLedger::new(100.0, 1.0);
        assert_eq!(step(PolicyKind::RoiDriven, &fresh, 0.1, &Outcome::none()), ROI_UP);

        let losing = ledger_with(10.0, 1, 20.0);
        assert_eq!(step(PolicyKind::RoiDriven, &losing, 0.1, &Outcome::none()), ROI_DOWN);

        let winning = ledger_with(10.0, 3, 20.0);
        assert_eq!(step(PolicyKind::RoiDriven, &winning, 0.1, &Outcome::none()), ROI_UP);
    }

    #[test]
    fn test_conservative() {
        let ahead = ledger_with(60.0, 0, 1.0);
        assert_eq!(
            step(PolicyKind::Conservative, &ahead, 0.5, &Outcome::none()),
            CONSERVATIVE_DOWN
        );
        let behind = ledger_with(10.0, 0, 1.0);
        assert_eq!(
            step(PolicyKind::Conservative, &behind, 0.5, &Outcome::none()),
            CONSERVATIVE_UP
        );
    }

    #[test]
    fn test_risk_averse() {
        let ledger = SellerLedger::new(100.0, 1.0);
        assert_eq!(step(PolicyKind::RiskAverse, &ledger, 0.0, &paid(1.0, false)), RISK_DOWN);
        assert_eq!(step(PolicyKind::RiskAverse, &ledger, 0.0, &paid(1.0, true)), RISK_UP);
        assert_eq!(step(PolicyKind::RiskAverse, &ledger, 0.0, &Outcome::none()), 1.0);
    }

    #[test]
    fn test_exploratory_ten_steps_bounded() {
        let initial = 0.8;
        let mut ledger = SellerLedger::new(100.0, initial);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let next =
                PolicyKind::Exploratory.next_shading(&ledger, 0.0, &Outcome::none(), &mut rng);
            ledger.set_shading(next);
        }
        let s = ledger.shading();
        assert!((MIN_SHADING..=MAX_SHADING).contains(&s));
        assert!(s >= initial * EXPLORE_LOW.powi(10) - 1e-12);
        assert!(s <= initial * EXPLORE_HIGH.powi(10) + 1e-12);
    }

    #[test]
    fn test_result_is_clamped() {
        let ledger = SellerLedger::new(100.0, MAX_SHADING);
        assert_eq!(
            step(PolicyKind::RiskAverse, &ledger, 0.0, &paid(1.0, true)),
            MAX_SHADING
        );
        let ledger = SellerLedger::new(100.0, MIN_SHADING);
        assert_eq!(
            step(PolicyKind::RiskAverse, &ledger, 0.0, &paid(1.0, false)),
            MIN_SHADING
        );
    }
}
