//! Agents crate: advertisers for the auction gym.
//!
//! This crate provides:
//! - [`SellerAgent`]: valuation-based bidding with a budgeted [`Campaign`]
//! - [`SellerLedger`]: per-block counters and the current shading coefficient
//! - [`BiddingPolicy`]: the shading transition implemented for every [`types::PolicyKind`]
//! - [`make_sellers`]: deterministic construction of a block's agents
//!
//! # Architecture
//! Agents bid on precomputed CTR/CVR rows. After the auction every agent,
//! winner or not, observes its [`Outcome`] and applies its policy:
//!
//! ```text
//! bid(ctr, cvr, elapsed) → Option<f64>
//! observe_and_adapt(clicked, converted, price_paid, elapsed)
//!   → ledger.record → policy.next_shading → clamp [0.01, 5.0]
//! ```

mod campaign;
mod factory;
mod policy;
mod seller;
mod state;

pub use campaign::{Campaign, PACING_AHEAD, PACING_BEHIND};
pub use factory::{embedding_matrix, make_sellers};
pub use policy::BiddingPolicy;
pub use seller::{DEFAULT_CAMPAIGN, SellerAgent};
pub use state::{MAX_SHADING, MIN_SHADING, Outcome, SellerLedger, clamp_shading};
