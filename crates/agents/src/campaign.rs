//! Budgeted campaign attached to each seller.

/// A seller's single campaign.
///
/// `spent` only grows. Once it reaches `daily_budget` the owner stops bidding,
/// though the last accepted click may overshoot by one clearing price.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub name: String,
    pub daily_budget: f64,
    spent: f64,
}

/// Pacing multiplier when spend runs ahead of the proportional target.
pub const PACING_AHEAD: f64 = 0.7;
/// Pacing multiplier otherwise.
pub const PACING_BEHIND: f64 = 1.1;

impl Campaign {
    pub fn new(name: impl Into<String>, daily_budget: f64) -> Self {
        Self {
            name: name.into(),
            daily_budget,
            spent: 0.0,
        }
    }

    pub fn spent(&self) -> f64 {
        self.spent
    }

    /// Record a charge. Negative amounts are ignored.
    pub fn charge(&mut self, amount: f64) {
        if amount > 0.0 {
            self.spent += amount;
        }
    }

    pub fn remaining_budget(&self) -> f64 {
        (self.daily_budget - self.spent).max(0.0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.daily_budget - self.spent <= 0.0
    }

    /// Proportional pacing hint for `elapsed ∈ [0, 1]` of the horizon.
    pub fn pacing_multiplier(&self, elapsed: f64) -> f64 {
        if self.spent > self.daily_budget * elapsed {
            PACING_AHEAD
        } else {
            PACING_BEHIND
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_tracking() {
        let mut c = Campaign::new("default", 10.0);
        c.charge(4.0);
        c.charge(-1.0);
        assert_eq!(c.spent(), 4.0);
        assert_eq!(c.remaining_budget(), 6.0);
        assert!(!c.is_exhausted());

        c.charge(7.0);
        assert_eq!(c.remaining_budget(), 0.0);
        assert!(c.is_exhausted());
    }

    #[test]
    fn test_pacing_multiplier() {
        let mut c = Campaign::new("default", 100.0);
        c.charge(30.0);
        assert_eq!(c.pacing_multiplier(0.2), PACING_AHEAD);
        assert_eq!(c.pacing_multiplier(0.5), PACING_BEHIND);
    }
}
