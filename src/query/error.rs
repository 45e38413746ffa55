//! Query error types
//!
//! Defines all error conditions that can occur while fetching and reducing
//! readings.

use thiserror::Error;

/// Errors raised by the statistics functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// A reduction was asked for over zero values
    #[error("No values to aggregate")]
    EmptyInput,

    /// Quantile fraction outside [0, 1]
    #[error("Invalid quantile: {0} (must be within 0 and 1)")]
    InvalidQuantile(f64),
}

/// Errors that can occur during query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// No rows matched the device and filter
    #[error("No data: {0}")]
    NoData(String),

    /// Statistical reduction failed
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// The shape cannot be answered for a single device
    #[error("Unsupported query shape for a device: {0:?}")]
    UnsupportedShape(crate::query::QueryShape),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

impl QueryError {
    /// Whether this error means "nothing matched" rather than a failure
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            QueryError::NoData(_) | QueryError::Stats(StatsError::EmptyInput)
        )
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
