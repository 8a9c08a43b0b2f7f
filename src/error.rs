use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the launch table at startup. Always fatal.
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid value {value:?} in column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("dataset contains no launch records")]
    Empty,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// A site or payload range that cannot be applied to the loaded dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("unknown launch site '{0}'")]
    InvalidSelection(String),

    #[error("invalid payload range [{low}, {high}]: {reason}")]
    InvalidRange { low: f64, high: f64, reason: &'static str },
}
