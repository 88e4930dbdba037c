//! Identifier types shared across the marketplace.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Stable identity of a seller, taken verbatim from `SellerConfig::id`.
///
/// Aggregation groups block rows by this key, so it must be unique within a run.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct SellerId(pub String);

impl SellerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SellerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Unix timestamp in seconds.
pub type Timestamp = u64;
