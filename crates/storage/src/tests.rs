use std::path::PathBuf;

use types::{
    HistoryPoint, MechanismKind, MetricsConfig, PolicyKind, RunMetrics, RunOutput, RunResult,
    SellerCounters, SellerId, SellerTotals,
};

use crate::{RunWriter, StorageError, read_run_sellers, read_seller_totals, read_summary};

fn output() -> RunOutput {
    let sellers = vec![
        SellerTotals::new(
            SellerId::from("alpha"),
            "acme".into(),
            PolicyKind::RoiDriven,
            0.4,
            SellerCounters {
                spend: 12.5,
                clicks: 40,
                conversions: 3,
                revenue: 75.0,
            },
            MetricsConfig::default(),
        ),
        SellerTotals::new(
            SellerId::from("beta"),
            "generic".into(),
            PolicyKind::Exploratory,
            0.5,
            SellerCounters::default(),
            MetricsConfig::default(),
        ),
    ];
    let history = vec![HistoryPoint {
        seller_id: SellerId::from("alpha"),
        policy: PolicyKind::RoiDriven,
        elapsed_frac: 0.0,
        shading: 0.8,
        spend: 0.0,
        roas: 0.0,
        remaining_budget: 50.0,
        pacing: 1.1,
    }];
    RunOutput {
        run: RunResult {
            sellers,
            metrics: RunMetrics {
                blocks: 2,
                opportunities: 2_000,
                platform_revenue: 12.5,
                social_welfare: 75.0,
                user_experience_sum: 18.0,
                user_experience: 0.009,
                mechanism: MechanismKind::Vcg,
                slots: 2,
                reserve_cpc: 0.01,
                metric_modes: MetricsConfig::default(),
                ts_start: 100,
                ts_end: 86_500,
            },
        },
        history,
    }
}

fn test_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_write_creates_all_files() {
    let dir = test_dir("test_storage_files");
    let files = RunWriter::new(&dir).write(&output()).unwrap();

    for path in [&files.sellers, &files.metrics, &files.history, &files.summary] {
        assert!(path.exists(), "{} missing", path.display());
    }
    assert_eq!(files.sellers, dir.join("sellers.parquet"));
}

#[test]
fn test_seller_totals_read_back() {
    let dir = test_dir("test_storage_sellers");
    let out = output();
    let files = RunWriter::new(&dir).write(&out).unwrap();

    let rows = read_seller_totals(&files.sellers).unwrap();
    assert_eq!(rows, out.run.sellers);
    assert_eq!(read_run_sellers(&dir).unwrap(), rows);
}

#[test]
fn test_summary_read_back() {
    let dir = test_dir("test_storage_summary");
    let out = output();
    RunWriter::new(&dir).write(&out).unwrap();

    let summary = read_summary(&dir).unwrap();
    assert_eq!(summary.metrics.opportunities, 2_000);
    assert_eq!(summary.metrics.mechanism, MechanismKind::Vcg);
    assert_eq!(summary.sellers.len(), 2);
    assert_eq!(summary.sellers[0].counters.clicks, 40);
    assert!((summary.metrics.user_experience - 0.009).abs() < 1e-12);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = read_seller_totals("target/does_not_exist/sellers.parquet").unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
}

#[test]
fn test_wrong_table_is_schema_error() {
    let dir = test_dir("test_storage_wrong_table");
    let files = RunWriter::new(&dir).write(&output()).unwrap();
    let err = read_seller_totals(&files.history).unwrap_err();
    assert!(matches!(err, StorageError::Schema(_)));
}

#[test]
fn test_history_carries_pacing_columns() {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let dir = test_dir("test_storage_history");
    let files = RunWriter::new(&dir).write(&output()).unwrap();

    let file = std::fs::File::open(&files.history).unwrap();
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
    let schema = builder.schema().clone();
    assert!(schema.field_with_name("remaining_budget").is_ok());
    assert!(schema.field_with_name("pacing").is_ok());

    let batch = builder.build().unwrap().next().unwrap().unwrap();
    assert_eq!(batch.num_rows(), 1);
}
