//! Integration tests for the block simulator and the block reduction.
//!
//! These exercise a full block end to end: traffic generation, scoring,
//! auctions, user outcomes and seller adaptation.

use agents::{MAX_SHADING, make_sellers};
use sim_core::AuctionMechanism;
use simulation::{combine, simulate};
use types::{MechanismKind, PolicyKind, RegulationConfig, SellerConfig, SimConfig, WorldConfig};

fn marketplace(mechanism: MechanismKind) -> SimConfig {
    let world = WorldConfig {
        start_ts: 1_700_000_000,
        ..Default::default()
    }
    .with_opportunities(6_000, 2_000)
    .with_mechanism(mechanism);
    SimConfig::new(
        world,
        vec![
            SellerConfig::new("acme", 40.0, 30.0, PolicyKind::Aggressive),
            SellerConfig::new("bolt", 40.0, 25.0, PolicyKind::RoiDriven).with_brand("bolt"),
            SellerConfig::new("cove", 40.0, 35.0, PolicyKind::Exploratory).with_seed(7),
            SellerConfig::new("dune", 40.0, 20.0, PolicyKind::RiskAverse),
        ],
    )
}

#[test]
fn test_block_is_deterministic() {
    let config = marketplace(MechanismKind::Gsp);
    let a = simulate(&config, 11, 2_000).unwrap();
    let b = simulate(&config, 11, 2_000).unwrap();
    assert_eq!(a, b);

    let c = simulate(&config, 12, 2_000).unwrap();
    assert_ne!(a.sellers, c.sellers);
}

#[test]
fn test_spend_matches_platform_revenue_for_every_mechanism() {
    for mechanism in [MechanismKind::FirstPrice, MechanismKind::Gsp, MechanismKind::Vcg] {
        let config = marketplace(mechanism);
        let block = simulate(&config, 3, 0).unwrap();
        let spend = block.total_spend();
        let revenue = block.metrics.platform_revenue;
        assert!(
            (spend - revenue).abs() <= 1e-9 * revenue.max(1.0),
            "{mechanism}: spend {spend} vs platform revenue {revenue}"
        );
        assert!(block.sellers.iter().all(|s| s.counters.conversions <= s.counters.clicks));
    }
}

#[test]
fn test_marketplace_produces_activity() {
    let config = marketplace(MechanismKind::Gsp);
    let block = simulate(&config, 5, 0).unwrap();
    let clicks: u64 = block.sellers.iter().map(|s| s.counters.clicks).sum();
    assert!(clicks > 0);
    assert!(block.metrics.user_experience > 0.0);
    assert!(block.metrics.user_experience <= config.world.base_ctr * 1.2);
}

#[test]
fn test_budget_overshoot_bounded_by_one_price() {
    let mut config = marketplace(MechanismKind::FirstPrice);
    for seller in &mut config.sellers {
        seller.daily_budget = 0.5;
    }
    let block = simulate(&config, 21, 0).unwrap();
    for (row, seller) in block.sellers.iter().zip(&config.sellers) {
        // A first-price charge never exceeds the highest possible bid.
        let max_price = MAX_SHADING * seller.value_per_conversion * config.world.base_cvr;
        assert!(
            row.counters.spend <= seller.daily_budget + max_price,
            "{} spent {}",
            row.seller_id,
            row.counters.spend
        );
    }
}

#[test]
fn test_reserve_floors_every_charge() {
    let mut config = marketplace(MechanismKind::Gsp);
    config.world = config.world.clone().with_regulation(RegulationConfig {
        reserve_cpc: 0.05,
        ..Default::default()
    });
    let block = simulate(&config, 2, 0).unwrap();
    for row in &block.sellers {
        assert!(row.counters.spend >= 0.05 * row.counters.clicks as f64 - 1e-9);
    }
}

#[test]
fn test_strict_regulation_blocks_everyone() {
    let mut config = marketplace(MechanismKind::Gsp);
    config.world.regulation.min_bid = 1_000.0;
    let block = simulate(&config, 2, 0).unwrap();
    assert_eq!(block.metrics.platform_revenue, 0.0);
    assert_eq!(block.metrics.user_experience_sum, 0.0);
}

#[test]
fn test_single_seller_first_price_pays_own_bid() {
    let mut config = marketplace(MechanismKind::FirstPrice);
    config.sellers.truncate(1);
    let sellers = make_sellers(&config, 1);
    let seller = &sellers[0];

    let cvr = 0.013;
    let bid = seller.bid(0.02, cvr, 0.0).unwrap();
    let mechanism = AuctionMechanism::from_world(&config.world).unwrap();
    let result = mechanism.run(&[bid], &[1.0]).unwrap();

    assert_eq!(result.winners.as_slice(), &[0]);
    assert_eq!(result.prices[0], seller.shading() * seller.value_per_conversion() * cvr);
}

#[test]
fn test_combine_is_order_independent() {
    let config = marketplace(MechanismKind::Vcg);
    let blocks: Vec<_> = (0..3)
        .map(|i| simulate(&config, 100 + i, i * 2_000).unwrap())
        .collect();
    let forward = combine(&blocks).unwrap();
    let reversed: Vec<_> = blocks.iter().rev().cloned().collect();
    let backward = combine(&reversed).unwrap();

    for (f, b) in forward.sellers.iter().zip(&backward.sellers) {
        assert_eq!(f.seller_id, b.seller_id);
        assert_eq!(f.counters.clicks, b.counters.clicks);
        assert!((f.counters.spend - b.counters.spend).abs() < 1e-9);
        assert!((f.roas - b.roas).abs() < 1e-9);
    }
    assert_eq!(forward.metrics.opportunities, 6_000);
    assert_eq!(forward.metrics.ts_start, config.world.start_ts);
    assert_eq!(
        forward.metrics.ts_end,
        config.world.start_ts + 4_000 + config.world.horizon_secs()
    );
}

#[test]
fn test_run_roas_is_ratio_of_sums() {
    let config = marketplace(MechanismKind::Gsp);
    let blocks: Vec<_> = (0..3)
        .map(|i| simulate(&config, 40 + i, i * 2_000).unwrap())
        .collect();
    let run = combine(&blocks).unwrap();

    for total in &run.sellers {
        let (spend, revenue) = blocks
            .iter()
            .flat_map(|b| b.sellers.iter())
            .filter(|s| s.seller_id == total.seller_id)
            .fold((0.0, 0.0), |(sp, rv), s| (sp + s.counters.spend, rv + s.counters.revenue));
        let expected = if spend > 0.0 { revenue / spend } else { 0.0 };
        assert!((total.roas - expected).abs() < 1e-9);
    }
}
