//! Failures while persisting daily counts and infection events.
//!
//! Writers return these from every row write; [`SimOutputObserver`] keeps
//! only the first one, since observer hooks cannot fail the run.
//!
//! [`SimOutputObserver`]: crate::SimOutputObserver

use thiserror::Error;

/// A daily-counts or infection-events write that could not be completed.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Creating the output directory or an output file failed.
    #[error("cannot write output file: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be serialized or flushed to `daily_counts.csv` or
    /// `infection_events.csv`.
    #[error("CSV row rejected: {0}")]
    Csv(#[from] csv::Error),

    /// Schema setup, an insert, or the closing checkpoint on `output.db` failed.
    #[cfg(feature = "sqlite")]
    #[error("output.db: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A counts or events batch did not match its column schema.
    #[cfg(feature = "parquet")]
    #[error("record batch rejected: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Encoding or closing a `.parquet` file failed.
    #[cfg(feature = "parquet")]
    #[error("parquet file: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
