//! Block simulator.
//!
//! One call to [`simulate`] is a complete, independent unit of work: it builds
//! its own agents and random streams from `(config, seed, start_offset)`,
//! generates and scores all of its traffic in bulk, then clears opportunities
//! one at a time in arrival order.
//!
//! ```text
//! for each opportunity t:
//!   1. bids      ← every seller, from ctr[t], cvr[t]
//!   2. qualities ← ctr[t] / max(ctr[t]), then regulatory screen
//!   3. auction   ← allocate + price, reserve floor
//!   4. users     ← clicks for all winners, then conversions
//!   5. observe   ← every seller, winner or not
//!   6. history   ← snapshot every `history_interval` opportunities
//! ```
//!
//! Random streams: outcomes draw from `seed`; traffic from a stream derived
//! from `seed`; agent embeddings from `seed + 1`.

use agents::{Outcome, SellerAgent, embedding_matrix, make_sellers};
use audience::{AudienceConfig, AudienceGenerator, TimeWindow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_core::{AuctionMechanism, Regulator, quality_scores};
use smallvec::SmallVec;
use tracing::debug;
use types::{
    BlockMetrics, BlockResult, HistoryPoint, STREAM_AUDIENCE, SimConfig, Timestamp, WorldConfig,
    derive_seed,
};

use crate::error::BlockError;

/// Opportunity range of one block and the horizon its traffic is drawn over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockWindow {
    pub offset: u64,
    pub len: u64,
    pub ts_start: Timestamp,
    pub ts_end: Timestamp,
}

impl BlockWindow {
    /// Locate the block starting at `offset`.
    ///
    /// Every block covers a full horizon beginning `offset` seconds after
    /// `start_ts`.
    pub fn locate(world: &WorldConfig, offset: u64) -> Result<Self, BlockError> {
        if offset >= world.opportunities {
            return Err(BlockError::OffsetOutOfRange {
                offset,
                opportunities: world.opportunities,
            });
        }
        let window = TimeWindow::from_hours(world.start_ts + offset, world.horizon_hours);
        Ok(Self {
            offset,
            len: world.batch_size.min(world.opportunities - offset),
            ts_start: window.start,
            ts_end: window.end(),
        })
    }

    pub fn time_window(&self) -> TimeWindow {
        TimeWindow::new(self.ts_start, self.ts_end - self.ts_start)
    }

    /// Fraction of the block's horizon elapsed at `ts`.
    pub fn elapsed(&self, ts: Timestamp) -> f64 {
        ts.saturating_sub(self.ts_start) as f64 / (self.ts_end - self.ts_start) as f64
    }
}

/// Simulate the block of `config` that starts at opportunity `start_offset`.
///
/// `config` is validated first, so a malformed configuration is reported as
/// [`BlockError::Config`] before any traffic is drawn.
pub fn simulate(
    config: &SimConfig,
    seed: u64,
    start_offset: u64,
) -> Result<BlockResult, BlockError> {
    config.validate()?;
    let world = &config.world;
    let _span = tracing::debug_span!("block", seed, offset = start_offset).entered();

    let window = BlockWindow::locate(world, start_offset)?;
    let mechanism = AuctionMechanism::from_world(world)?;
    let regulator = Regulator::new(world.regulation);
    let multipliers = mechanism.multipliers();

    let mut outcome_rng = StdRng::seed_from_u64(seed);
    let mut generator = AudienceGenerator::new(
        AudienceConfig::from_world(world),
        derive_seed(seed, STREAM_AUDIENCE),
    );
    let mut sellers = make_sellers(config, seed.wrapping_add(1));

    let batch = generator.batch(window.len as usize, window.time_window());
    let scored = generator.score(&batch, &embedding_matrix(&sellers));

    let seller_count = sellers.len();
    let mut bids = vec![0.0; seller_count];
    let mut outcomes = vec![Outcome::none(); seller_count];
    let mut history = Vec::new();
    let mut totals = Accumulated::default();

    for t in 0..batch.len() {
        let ctr = scored.ctr_row(t);
        let cvr = scored.cvr_row(t);
        let elapsed = window.elapsed(batch.timestamps[t]);

        for (i, seller) in sellers.iter().enumerate() {
            bids[i] = seller.bid(ctr[i], cvr[i], elapsed).unwrap_or(0.0);
        }
        let mut qualities = quality_scores(ctr);
        regulator.screen(&mut bids, &mut qualities);

        let mut auction = mechanism.run(&bids, &qualities)?;
        regulator.floor_prices(&mut auction.prices);

        let shown: SmallVec<[f64; 4]> = auction
            .winners
            .iter()
            .enumerate()
            .map(|(rank, &w)| ctr[w] * multipliers[rank])
            .collect();
        let clicked: SmallVec<[bool; 4]> =
            shown.iter().map(|&p| outcome_rng.random::<f64>() < p).collect();
        let converted: SmallVec<[bool; 4]> = auction
            .winners
            .iter()
            .zip(&clicked)
            .map(|(&w, &click)| outcome_rng.random::<f64>() < cvr[w] && click)
            .collect();

        outcomes.fill(Outcome::none());
        for (rank, seller_index, price) in auction.iter() {
            let outcome = Outcome {
                clicked: clicked[rank],
                converted: converted[rank],
                price_paid: if clicked[rank] { price } else { 0.0 },
            };
            totals.platform_revenue += outcome.price_paid;
            if outcome.converted {
                totals.social_welfare += sellers[seller_index].value_per_conversion();
            }
            outcomes[seller_index] = outcome;
        }
        for (seller, outcome) in sellers.iter_mut().zip(&outcomes) {
            seller.observe_and_adapt(
                outcome.clicked,
                outcome.converted,
                outcome.price_paid,
                elapsed,
            );
        }

        if !shown.is_empty() {
            totals.user_experience_sum += shown.iter().sum::<f64>() / shown.len() as f64;
        }
        if t as u64 % world.history_interval == 0 {
            history.extend(snapshot(&sellers, elapsed));
        }
    }

    let result = finish(config, seed, window, &sellers, totals, history);
    debug!(
        opportunities = result.metrics.opportunities,
        platform_revenue = result.metrics.platform_revenue,
        social_welfare = result.metrics.social_welfare,
        "block complete"
    );
    Ok(result)
}

#[derive(Debug, Default)]
struct Accumulated {
    platform_revenue: f64,
    social_welfare: f64,
    user_experience_sum: f64,
}

fn snapshot(sellers: &[SellerAgent], elapsed: f64) -> impl Iterator<Item = HistoryPoint> + '_ {
    sellers.iter().map(move |s| s.snapshot(elapsed))
}

fn finish(
    config: &SimConfig,
    seed: u64,
    window: BlockWindow,
    sellers: &[SellerAgent],
    totals: Accumulated,
    history: Vec<HistoryPoint>,
) -> BlockResult {
    let world = &config.world;
    let opportunities = window.len;
    BlockResult {
        start_offset: window.offset,
        seed,
        sellers: sellers.iter().map(|s| s.totals(world.metrics)).collect(),
        metrics: BlockMetrics {
            opportunities,
            platform_revenue: totals.platform_revenue,
            social_welfare: totals.social_welfare,
            user_experience_sum: totals.user_experience_sum,
            user_experience: if opportunities > 0 {
                totals.user_experience_sum / opportunities as f64
            } else {
                0.0
            },
            mechanism: world.mechanism,
            slots: world.slots,
            reserve_cpc: world.regulation.reserve_cpc,
            metric_modes: world.metrics,
            ts_start: window.ts_start,
            ts_end: window.ts_end,
        },
        history,
    }
}
