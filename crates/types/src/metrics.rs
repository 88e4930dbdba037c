//! Ratio metrics derived from seller counters.
//!
//! Every ratio is defined as 0 when spend is 0. Ratios are always computed from
//! totals, never averaged.

use crate::config::{RoasMode, RocsMode};

/// Return on ad spend under the configured mode.
pub fn roas(mode: RoasMode, revenue: f64, spend: f64) -> f64 {
    if spend <= 0.0 {
        return 0.0;
    }
    match mode {
        RoasMode::ValueOverSpend => revenue / spend,
        RoasMode::ProfitOverSpend => (revenue - spend) / spend,
    }
}

/// Return on cost of sales: margin after cost of goods, net of spend, per unit spend.
pub fn rocs(mode: RocsMode, revenue: f64, spend: f64, cogs_ratio: f64) -> f64 {
    if spend <= 0.0 {
        return 0.0;
    }
    match mode {
        RocsMode::RevenueMinusCogsOverSpend => (revenue * (1.0 - cogs_ratio) - spend) / spend,
    }
}

pub fn surplus(revenue: f64, spend: f64) -> f64 {
    revenue - spend
}
