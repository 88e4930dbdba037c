//! Reading run outputs back.

use std::fs::File;
use std::path::Path;

use arrow::array::{Array, Float64Array, StringArray, UInt64Array};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use types::{PolicyKind, RunResult, SellerCounters, SellerId, SellerTotals};

use crate::error::{Result, StorageError};
use crate::schema::{SELLERS_FILE, SUMMARY_FILE};

/// Read a `sellers.parquet` table.
pub fn read_seller_totals(path: impl AsRef<Path>) -> Result<Vec<SellerTotals>> {
    let file = File::open(path.as_ref())?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let seller_id = column::<StringArray>(&batch, "seller_id")?;
        let brand = column::<StringArray>(&batch, "brand")?;
        let policy = column::<StringArray>(&batch, "policy")?;
        let cogs_ratio = column::<Float64Array>(&batch, "cogs_ratio")?;
        let spend = column::<Float64Array>(&batch, "spend")?;
        let clicks = column::<UInt64Array>(&batch, "clicks")?;
        let conversions = column::<UInt64Array>(&batch, "conversions")?;
        let revenue = column::<Float64Array>(&batch, "revenue")?;
        let roas = column::<Float64Array>(&batch, "roas")?;
        let rocs = column::<Float64Array>(&batch, "rocs")?;
        let surplus = column::<Float64Array>(&batch, "surplus")?;

        for i in 0..batch.num_rows() {
            let policy_name = policy.value(i);
            let policy = PolicyKind::from_name(policy_name)
                .ok_or_else(|| StorageError::Schema(format!("unknown policy `{policy_name}`")))?;
            rows.push(SellerTotals {
                seller_id: SellerId::from(seller_id.value(i)),
                brand: brand.value(i).to_string(),
                policy,
                cogs_ratio: cogs_ratio.value(i),
                counters: SellerCounters {
                    spend: spend.value(i),
                    clicks: clicks.value(i),
                    conversions: conversions.value(i),
                    revenue: revenue.value(i),
                },
                roas: roas.value(i),
                rocs: rocs.value(i),
                surplus: surplus.value(i),
            });
        }
    }
    Ok(rows)
}

/// Read the seller table of a run directory.
pub fn read_run_sellers(dir: impl AsRef<Path>) -> Result<Vec<SellerTotals>> {
    read_seller_totals(dir.as_ref().join(SELLERS_FILE))
}

/// Read `summary.json` of a run directory.
pub fn read_summary(dir: impl AsRef<Path>) -> Result<RunResult> {
    let file = File::open(dir.as_ref().join(SUMMARY_FILE))?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

fn column<'a, A: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a A> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<A>())
        .ok_or_else(|| StorageError::Schema(format!("missing or mistyped column `{name}`")))
}
