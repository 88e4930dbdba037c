//! Run output writer.
//!
//! Writes the three run tables as Snappy-compressed Parquet and the combined
//! [`RunResult`](types::RunResult) as pretty JSON into one directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder, UInt64Builder};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::info;
use types::{HistoryPoint, RunMetrics, RunOutput, SellerTotals};

use crate::error::Result;
use crate::schema::{
    HISTORY_FILE, METRICS_FILE, SELLERS_FILE, SUMMARY_FILE, history_schema, metrics_schema,
    sellers_schema,
};

/// Paths of everything a [`RunWriter`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFiles {
    pub sellers: PathBuf,
    pub metrics: PathBuf,
    pub history: PathBuf,
    pub summary: PathBuf,
}

/// Writes one run into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct RunWriter {
    dir: PathBuf,
}

impl RunWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, output: &RunOutput) -> Result<RunFiles> {
        fs::create_dir_all(&self.dir)?;
        let files = RunFiles {
            sellers: self.dir.join(SELLERS_FILE),
            metrics: self.dir.join(METRICS_FILE),
            history: self.dir.join(HISTORY_FILE),
            summary: self.dir.join(SUMMARY_FILE),
        };

        write_parquet(&files.sellers, sellers_batch(&output.run.sellers)?)?;
        write_parquet(&files.metrics, metrics_batch(&output.run.metrics)?)?;
        write_parquet(&files.history, history_batch(&output.history)?)?;

        let mut summary = BufWriter::new(File::create(&files.summary)?);
        serde_json::to_writer_pretty(&mut summary, &output.run)?;
        summary.flush()?;

        info!(
            dir = %self.dir.display(),
            sellers = output.run.sellers.len(),
            history = output.history.len(),
            "run written"
        );
        Ok(files)
    }
}

fn write_parquet(path: &Path, batch: RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn sellers_batch(rows: &[SellerTotals]) -> Result<RecordBatch> {
    let mut seller_id = StringBuilder::new();
    let mut brand = StringBuilder::new();
    let mut policy = StringBuilder::new();
    let mut cogs_ratio = Float64Builder::with_capacity(rows.len());
    let mut spend = Float64Builder::with_capacity(rows.len());
    let mut clicks = UInt64Builder::with_capacity(rows.len());
    let mut conversions = UInt64Builder::with_capacity(rows.len());
    let mut revenue = Float64Builder::with_capacity(rows.len());
    let mut roas = Float64Builder::with_capacity(rows.len());
    let mut rocs = Float64Builder::with_capacity(rows.len());
    let mut surplus = Float64Builder::with_capacity(rows.len());

    for row in rows {
        seller_id.append_value(row.seller_id.as_str());
        brand.append_value(&row.brand);
        policy.append_value(row.policy.as_str());
        cogs_ratio.append_value(row.cogs_ratio);
        spend.append_value(row.counters.spend);
        clicks.append_value(row.counters.clicks);
        conversions.append_value(row.counters.conversions);
        revenue.append_value(row.counters.revenue);
        roas.append_value(row.roas);
        rocs.append_value(row.rocs);
        surplus.append_value(row.surplus);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(seller_id.finish()),
        Arc::new(brand.finish()),
        Arc::new(policy.finish()),
        Arc::new(cogs_ratio.finish()),
        Arc::new(spend.finish()),
        Arc::new(clicks.finish()),
        Arc::new(conversions.finish()),
        Arc::new(revenue.finish()),
        Arc::new(roas.finish()),
        Arc::new(rocs.finish()),
        Arc::new(surplus.finish()),
    ];
    Ok(RecordBatch::try_new(sellers_schema(), columns)?)
}

fn metrics_batch(m: &RunMetrics) -> Result<RecordBatch> {
    let f64_col = |v: f64| -> ArrayRef {
        let mut b = Float64Builder::with_capacity(1);
        b.append_value(v);
        Arc::new(b.finish())
    };
    let u64_col = |v: u64| -> ArrayRef {
        let mut b = UInt64Builder::with_capacity(1);
        b.append_value(v);
        Arc::new(b.finish())
    };
    let str_col = |v: &str| -> ArrayRef {
        let mut b = StringBuilder::new();
        b.append_value(v);
        Arc::new(b.finish())
    };

    let columns = vec![
        u64_col(m.blocks),
        u64_col(m.opportunities),
        f64_col(m.platform_revenue),
        f64_col(m.social_welfare),
        f64_col(m.user_experience_sum),
        f64_col(m.user_experience),
        str_col(m.mechanism.as_str()),
        u64_col(m.slots as u64),
        f64_col(m.reserve_cpc),
        str_col(m.metric_modes.roas_mode.as_str()),
        str_col(m.metric_modes.rocs_mode.as_str()),
        u64_col(m.ts_start),
        u64_col(m.ts_end),
    ];
    Ok(RecordBatch::try_new(metrics_schema(), columns)?)
}

fn history_batch(points: &[HistoryPoint]) -> Result<RecordBatch> {
    let mut seller_id = StringBuilder::new();
    let mut policy = StringBuilder::new();
    let mut elapsed = Float64Builder::with_capacity(points.len());
    let mut shading = Float64Builder::with_capacity(points.len());
    let mut spend = Float64Builder::with_capacity(points.len());
    let mut roas = Float64Builder::with_capacity(points.len());
    let mut remaining_budget = Float64Builder::with_capacity(points.len());
    let mut pacing = Float64Builder::with_capacity(points.len());

    for p in points {
        seller_id.append_value(p.seller_id.as_str());
        policy.append_value(p.policy.as_str());
        elapsed.append_value(p.elapsed_frac);
        shading.append_value(p.shading);
        spend.append_value(p.spend);
        roas.append_value(p.roas);
        remaining_budget.append_value(p.remaining_budget);
        pacing.append_value(p.pacing);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(seller_id.finish()),
        Arc::new(policy.finish()),
        Arc::new(elapsed.finish()),
        Arc::new(shading.finish()),
        Arc::new(spend.finish()),
        Arc::new(roas.finish()),
        Arc::new(remaining_budget.finish()),
        Arc::new(pacing.finish()),
    ];
    Ok(RecordBatch::try_new(history_schema(), columns)?)
}
