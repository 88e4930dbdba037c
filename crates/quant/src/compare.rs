//! Seller-level comparison of two runs.

use serde::Serialize;
use types::SellerTotals;

use crate::stats::{mean, welch_t_test};

/// Seller columns compared between runs, in report order.
pub const COMPARED_METRICS: [&str; 7] = [
    "spend",
    "clicks",
    "conversions",
    "revenue",
    "roas",
    "rocs",
    "surplus",
];

/// One row of a run comparison. `delta` is `mean_b - mean_a`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: &'static str,
    pub mean_a: f64,
    pub mean_b: f64,
    pub delta: f64,
    pub p_value: f64,
}

fn metric_value(row: &SellerTotals, metric: &str) -> f64 {
    match metric {
        "spend" => row.counters.spend,
        "clicks" => row.counters.clicks as f64,
        "conversions" => row.counters.conversions as f64,
        "revenue" => row.counters.revenue,
        "roas" => row.roas,
        "rocs" => row.rocs,
        _ => row.surplus,
    }
}

/// Compare seller distributions of run `a` against run `b` with Welch's t-test.
///
/// Empty runs report NaN means.
pub fn compare(a: &[SellerTotals], b: &[SellerTotals]) -> Vec<MetricComparison> {
    COMPARED_METRICS
        .iter()
        .map(|&metric| {
            let xs: Vec<f64> = a.iter().map(|r| metric_value(r, metric)).collect();
            let ys: Vec<f64> = b.iter().map(|r| metric_value(r, metric)).collect();
            let mean_a = mean(&xs).unwrap_or(f64::NAN);
            let mean_b = mean(&ys).unwrap_or(f64::NAN);
            MetricComparison {
                metric,
                mean_a,
                mean_b,
                delta: mean_b - mean_a,
                p_value: welch_t_test(&xs, &ys).p_value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{MetricsConfig, PolicyKind, SellerCounters, SellerId};

    fn seller(id: &str, spend: f64, clicks: u64, revenue: f64) -> SellerTotals {
        SellerTotals::new(
            SellerId::from(id),
            "generic".into(),
            PolicyKind::Aggressive,
            0.5,
            SellerCounters {
                spend,
                clicks,
                conversions: clicks / 10,
                revenue,
            },
            MetricsConfig::default(),
        )
    }

    #[test]
    fn test_compare_reports_every_metric() {
        let a = vec![seller("x", 1.0, 10, 4.0), seller("y", 2.0, 20, 6.0)];
        let b = vec![seller("x", 3.0, 30, 9.0), seller("y", 5.0, 40, 10.0)];
        let rows = compare(&a, &b);

        let names: Vec<_> = rows.iter().map(|r| r.metric).collect();
        assert_eq!(names, COMPARED_METRICS);

        let spend = &rows[0];
        assert_eq!(spend.mean_a, 1.5);
        assert_eq!(spend.mean_b, 4.0);
        assert_eq!(spend.delta, 2.5);
        assert!(spend.p_value > 0.0 && spend.p_value < 1.0);
    }

    #[test]
    fn test_identical_constant_runs_are_degenerate() {
        let a = vec![seller("x", 1.0, 10, 4.0), seller("y", 1.0, 10, 4.0)];
        let rows = compare(&a, &a);
        assert!(rows.iter().all(|r| r.delta == 0.0));
        assert!(rows.iter().all(|r| r.p_value.is_nan()));
    }
}
