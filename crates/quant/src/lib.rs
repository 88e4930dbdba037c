//! Quant: statistics for analysing auction gym runs.
//!
//! This crate provides:
//! - Basic sample statistics (mean, sample variance)
//! - Welch's unequal-variance t-test with Student-t p-values
//! - Seller-level comparison of two runs

pub mod compare;
pub mod stats;

pub use compare::{COMPARED_METRICS, MetricComparison, compare};
pub use stats::{WelchTest, mean, sample_variance, welch_t_test};
