//! Configuration errors, raised before any block executes.

use thiserror::Error;

use crate::ids::SellerId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("at least one slot is required")]
    NoSlots,

    #[error("{slots} slots configured but only {provided} slot multipliers provided")]
    SlotMultipliers { slots: usize, provided: usize },

    #[error("slot multipliers must be finite and non-negative")]
    NegativeSlotMultiplier,

    #[error("slot multipliers must be non-increasing (slot {position} exceeds the slot above it)")]
    IncreasingSlotMultipliers { position: usize },

    #[error("{0} must be greater than zero")]
    ZeroField(&'static str),

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("seller {id}: {reason}")]
    InvalidSeller { id: SellerId, reason: &'static str },

    #[error("seller id {0} appears more than once")]
    DuplicateSeller(SellerId),

    #[error("no sellers configured")]
    NoSellers,
}
