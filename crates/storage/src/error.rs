//! Storage error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A file was readable but did not have the expected columns or values.
    #[error("schema error: {0}")]
    Schema(String),
}
