//! Error types for report aggregation and table handling.

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used by the library's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the library.
#[derive(Error, Debug)]
pub enum Error {
    /// Not a single daily report in the requested range could be used.
    #[error("no daily reports could be loaded between {start} and {end}")]
    NoReports { start: NaiveDate, end: NaiveDate },

    #[error("invalid date '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed table: {0}")]
    Table(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single daily report could not be projected to the metric column.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{0}' not present in report")]
    MissingColumn(String),
}
