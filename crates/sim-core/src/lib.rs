//! Sim-core: marketplace mechanics for the auction gym.
//!
//! This crate provides the per-opportunity clearing components:
//! - Allocation of ranked slots by quality-weighted bid
//! - First-price, GSP and VCG pricing over a shared allocation
//! - Regulatory screening and reserve price floors
//! - Error handling for mechanism inputs

mod error;
mod mechanism;
mod regulator;

pub use error::{Result, SimCoreError};
pub use mechanism::{
    AuctionMechanism, AuctionResult, EPSILON, Prices, Winners, allocate, prices_first_price,
    prices_gsp, prices_vcg, quality_scores,
};
pub use regulator::Regulator;
