//! Arrow schemas of the run tables.
//!
//! - `sellers.parquet`: one row per seller, run totals and derived ratios
//! - `metrics.parquet`: one row of run-level metrics
//! - `history.parquet`: shading/spend snapshots, one row per seller per snapshot

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

pub const SELLERS_FILE: &str = "sellers.parquet";
pub const METRICS_FILE: &str = "metrics.parquet";
pub const HISTORY_FILE: &str = "history.parquet";
pub const SUMMARY_FILE: &str = "summary.json";

pub fn sellers_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("seller_id", DataType::Utf8, false),
        Field::new("brand", DataType::Utf8, false),
        Field::new("policy", DataType::Utf8, false),
        Field::new("cogs_ratio", DataType::Float64, false),
        Field::new("spend", DataType::Float64, false),
        Field::new("clicks", DataType::UInt64, false),
        Field::new("conversions", DataType::UInt64, false),
        Field::new("revenue", DataType::Float64, false),
        Field::new("roas", DataType::Float64, false),
        Field::new("rocs", DataType::Float64, false),
        Field::new("surplus", DataType::Float64, false),
    ]))
}

pub fn metrics_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("blocks", DataType::UInt64, false),
        Field::new("opportunities", DataType::UInt64, false),
        Field::new("platform_revenue", DataType::Float64, false),
        Field::new("social_welfare", DataType::Float64, false),
        Field::new("user_experience_sum", DataType::Float64, false),
        Field::new("user_experience", DataType::Float64, false),
        Field::new("mechanism", DataType::Utf8, false),
        Field::new("slots", DataType::UInt64, false),
        Field::new("reserve_cpc", DataType::Float64, false),
        Field::new("roas_mode", DataType::Utf8, false),
        Field::new("rocs_mode", DataType::Utf8, false),
        Field::new("ts_start", DataType::UInt64, false),
        Field::new("ts_end", DataType::UInt64, false),
    ]))
}

pub fn history_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("seller_id", DataType::Utf8, false),
        Field::new("policy", DataType::Utf8, false),
        Field::new("elapsed_frac", DataType::Float64, false),
        Field::new("shading", DataType::Float64, false),
        Field::new("spend", DataType::Float64, false),
        Field::new("roas", DataType::Float64, false),
        Field::new("remaining_budget", DataType::Float64, false),
        Field::new("pacing", DataType::Float64, false),
    ]))
}
