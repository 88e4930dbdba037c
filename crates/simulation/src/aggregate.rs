//! Reduction of block results into a run result.
//!
//! Only additive quantities are summed: seller counters, opportunities,
//! platform revenue, social welfare and the user-experience sum. Ratios are
//! re-derived from the summed counters in [`RunAccumulator::finish`], so the
//! run ROAS is total revenue over total spend rather than a mean of block ROAS.
//! Mechanism, slots, reserve and metric modes are carried and must agree.
//!
//! Absorbing and merging are order-independent up to floating-point summation
//! order, so blocks may be reduced in any grouping.

use std::collections::BTreeMap;

use types::{
    BlockResult, MechanismKind, MetricsConfig, PolicyKind, RunMetrics, RunResult, SellerCounters,
    SellerId, SellerTotals, Timestamp,
};

use crate::error::AggregationError;

type Result<T> = std::result::Result<T, AggregationError>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct RunConstants {
    mechanism: MechanismKind,
    slots: usize,
    reserve_cpc: f64,
    metric_modes: MetricsConfig,
}

impl RunConstants {
    fn of(block: &BlockResult) -> Self {
        let m = &block.metrics;
        Self {
            mechanism: m.mechanism,
            slots: m.slots,
            reserve_cpc: m.reserve_cpc,
            metric_modes: m.metric_modes,
        }
    }

    /// Name of the first field that differs, if any.
    fn mismatch(&self, other: &Self) -> Option<&'static str> {
        if self.mechanism != other.mechanism {
            Some("mechanism")
        } else if self.slots != other.slots {
            Some("slots")
        } else if self.reserve_cpc != other.reserve_cpc {
            Some("reserve_cpc")
        } else if self.metric_modes != other.metric_modes {
            Some("metric_modes")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SellerEntry {
    brand: String,
    policy: PolicyKind,
    cogs_ratio: f64,
    counters: SellerCounters,
}

impl SellerEntry {
    fn of(row: &SellerTotals) -> Self {
        Self {
            brand: row.brand.clone(),
            policy: row.policy,
            cogs_ratio: row.cogs_ratio,
            counters: row.counters,
        }
    }

    fn mismatch(&self, other: &Self) -> Option<&'static str> {
        if self.brand != other.brand {
            Some("brand")
        } else if self.policy != other.policy {
            Some("policy")
        } else if self.cogs_ratio != other.cogs_ratio {
            Some("cogs_ratio")
        } else {
            None
        }
    }
}

/// Running reduction over any number of blocks.
#[derive(Debug, Clone, Default)]
pub struct RunAccumulator {
    constants: Option<RunConstants>,
    /// Offset of the first absorbed block, used in error reports.
    first_offset: u64,
    sellers: BTreeMap<SellerId, SellerEntry>,
    blocks: u64,
    opportunities: u64,
    platform_revenue: f64,
    social_welfare: f64,
    user_experience_sum: f64,
    ts_start: Timestamp,
    ts_end: Timestamp,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    pub fn absorb(&mut self, block: &BlockResult) -> Result<()> {
        let mut single = Self::new();
        single.constants = Some(RunConstants::of(block));
        single.first_offset = block.start_offset;
        for row in &block.sellers {
            if single.sellers.insert(row.seller_id.clone(), SellerEntry::of(row)).is_some() {
                return Err(AggregationError::SellerSetMismatch {
                    offset: block.start_offset,
                });
            }
        }
        let m = &block.metrics;
        single.blocks = 1;
        single.opportunities = m.opportunities;
        single.platform_revenue = m.platform_revenue;
        single.social_welfare = m.social_welfare;
        single.user_experience_sum = m.user_experience_sum;
        single.ts_start = m.ts_start;
        single.ts_end = m.ts_end;
        self.merge(single)
    }

    /// Fold another partial reduction into this one.
    pub fn merge(&mut self, other: RunAccumulator) -> Result<()> {
        if other.blocks == 0 {
            return Ok(());
        }
        if self.blocks == 0 {
            *self = other;
            return Ok(());
        }
        let constant_mismatch = match (&self.constants, &other.constants) {
            (Some(mine), Some(theirs)) => mine.mismatch(theirs),
            _ => None,
        };
        if let Some(field) = constant_mismatch {
            return Err(AggregationError::RunConstantMismatch {
                offset: other.first_offset,
                field,
            });
        }
        if self.sellers.len() != other.sellers.len()
            || !other.sellers.keys().all(|id| self.sellers.contains_key(id))
        {
            return Err(AggregationError::SellerSetMismatch {
                offset: other.first_offset,
            });
        }
        for (id, entry) in &other.sellers {
            if let Some(field) = self.sellers.get(id).and_then(|mine| mine.mismatch(entry)) {
                return Err(AggregationError::SellerAttributeMismatch {
                    seller_id: id.clone(),
                    field,
                });
            }
        }

        for (id, entry) in other.sellers {
            if let Some(mine) = self.sellers.get_mut(&id) {
                mine.counters += entry.counters;
            }
        }
        self.first_offset = self.first_offset.min(other.first_offset);
        self.blocks += other.blocks;
        self.opportunities += other.opportunities;
        self.platform_revenue += other.platform_revenue;
        self.social_welfare += other.social_welfare;
        self.user_experience_sum += other.user_experience_sum;
        self.ts_start = self.ts_start.min(other.ts_start);
        self.ts_end = self.ts_end.max(other.ts_end);
        Ok(())
    }

    pub fn finish(self) -> Result<RunResult> {
        let Some(constants) = self.constants.filter(|_| self.blocks > 0) else {
            return Err(AggregationError::Empty);
        };
        let modes = constants.metric_modes;
        let sellers = self
            .sellers
            .into_iter()
            .map(|(id, e)| {
                SellerTotals::new(id, e.brand, e.policy, e.cogs_ratio, e.counters, modes)
            })
            .collect();
        let user_experience = if self.opportunities > 0 {
            self.user_experience_sum / self.opportunities as f64
        } else {
            0.0
        };
        Ok(RunResult {
            sellers,
            metrics: RunMetrics {
                blocks: self.blocks,
                opportunities: self.opportunities,
                platform_revenue: self.platform_revenue,
                social_welfare: self.social_welfare,
                user_experience_sum: self.user_experience_sum,
                user_experience,
                mechanism: constants.mechanism,
                slots: constants.slots,
                reserve_cpc: constants.reserve_cpc,
                metric_modes: modes,
                ts_start: self.ts_start,
                ts_end: self.ts_end,
            },
        })
    }
}

/// Combine block results into one run result.
pub fn combine<'a>(blocks: impl IntoIterator<Item = &'a BlockResult>) -> Result<RunResult> {
    let mut acc = RunAccumulator::new();
    for block in blocks {
        acc.absorb(block)?;
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::BlockMetrics;

    fn row(id: &str, spend: f64, revenue: f64) -> SellerTotals {
        SellerTotals::new(
            SellerId::from(id),
            "generic".into(),
            PolicyKind::Conservative,
            0.5,
            SellerCounters {
                spend,
                clicks: 1,
                conversions: 1,
                revenue,
            },
            MetricsConfig::default(),
        )
    }

    fn block(offset: u64, sellers: Vec<SellerTotals>) -> BlockResult {
        let platform_revenue = sellers.iter().map(|s| s.counters.spend).sum();
        BlockResult {
            start_offset: offset,
            seed: offset,
            sellers,
            metrics: BlockMetrics {
                opportunities: 100,
                platform_revenue,
                social_welfare: 0.0,
                user_experience_sum: 1.0,
                user_experience: 0.01,
                mechanism: MechanismKind::Gsp,
                slots: 3,
                reserve_cpc: 0.0,
                metric_modes: MetricsConfig::default(),
                ts_start: 1_000 + offset,
                ts_end: 1_100 + offset,
            },
            history: vec![],
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(combine(std::iter::empty()), Err(AggregationError::Empty));
        assert_eq!(RunAccumulator::new().finish(), Err(AggregationError::Empty));
    }

    #[test]
    fn test_roas_recomputed_after_sum() {
        let b1 = block(0, vec![row("s", 10.0, 100.0)]);
        let b2 = block(100, vec![row("s", 90.0, 90.0)]);
        let run = combine(&[b1.clone(), b2.clone()]).unwrap();
        let s = &run.sellers[0];

        assert_eq!(s.counters.spend, 100.0);
        assert_eq!(s.roas, 190.0 / 100.0);
        let mean_of_blocks = (b1.sellers[0].roas + b2.sellers[0].roas) / 2.0;
        assert_ne!(s.roas, mean_of_blocks);
        assert_eq!(run.metrics.blocks, 2);
        assert_eq!(run.metrics.opportunities, 200);
        assert_eq!(run.metrics.user_experience, 2.0 / 200.0);
        assert_eq!(run.metrics.ts_start, 1_000);
        assert_eq!(run.metrics.ts_end, 1_200);
    }

    #[test]
    fn test_order_independent() {
        let b1 = block(0, vec![row("a", 1.0, 3.0), row("b", 2.0, 5.0)]);
        let b2 = block(100, vec![row("b", 4.0, 1.0), row("a", 8.0, 2.0)]);
        let forward = combine(&[b1.clone(), b2.clone()]).unwrap();
        let backward = combine(&[b2, b1]).unwrap();
        assert_eq!(forward.sellers, backward.sellers);
        assert_eq!(forward.sellers[0].seller_id, SellerId::from("a"));
    }

    #[test]
    fn test_merge_partials() {
        let blocks: Vec<_> = (0..4).map(|i| block(i * 100, vec![row("s", 1.0, 2.0)])).collect();
        let mut left = RunAccumulator::new();
        let mut right = RunAccumulator::new();
        for b in &blocks[..2] {
            left.absorb(b).unwrap();
        }
        for b in &blocks[2..] {
            right.absorb(b).unwrap();
        }
        left.merge(right).unwrap();
        assert_eq!(left.finish().unwrap(), combine(&blocks).unwrap());
    }

    #[test]
    fn test_seller_set_mismatch() {
        let b1 = block(0, vec![row("a", 1.0, 1.0)]);
        let b2 = block(100, vec![row("b", 1.0, 1.0)]);
        assert_eq!(
            combine(&[b1, b2]),
            Err(AggregationError::SellerSetMismatch { offset: 100 })
        );
    }

    #[test]
    fn test_run_constant_mismatch() {
        let b1 = block(0, vec![row("a", 1.0, 1.0)]);
        let mut b2 = block(100, vec![row("a", 1.0, 1.0)]);
        b2.metrics.mechanism = MechanismKind::Vcg;
        assert_eq!(
            combine(&[b1, b2]),
            Err(AggregationError::RunConstantMismatch {
                offset: 100,
                field: "mechanism"
            })
        );
    }

    #[test]
    fn test_seller_attribute_mismatch() {
        let b1 = block(0, vec![row("a", 1.0, 1.0)]);
        let mut other = row("a", 1.0, 1.0);
        other.policy = PolicyKind::Exploratory;
        let b2 = block(100, vec![other]);
        assert!(matches!(
            combine(&[b1, b2]),
            Err(AggregationError::SellerAttributeMismatch { field: "policy", .. })
        ));
    }
}
