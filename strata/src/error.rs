//! Error types for the strata time-series store.

use thiserror::Error;

/// The main error type for all strata operations.
///
/// This enum covers all possible error conditions that can occur across the
/// store, from configuration validation to the push hot path and queries.
#[derive(Error, Debug)]
pub enum StrataError {
    /// Error during configuration validation.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error during series registration.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Error during a query operation (read path).
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Error in the underlying chunked storage (write path).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The series start timestamp is not a finite number.
    #[error("start timestamp {start} is not finite")]
    NonFiniteStart {
        /// The offending start value.
        start: f64,
    },

    /// The sample interval is zero, negative, or not finite.
    #[error("sample interval {interval} is invalid: {reason}")]
    InvalidInterval {
        /// The offending interval value.
        interval: f64,
        /// Why the interval is invalid.
        reason: String,
    },

    /// The pyramid reduction factor is too small.
    #[error("reduction factor {factor} is invalid (must be >= 2)")]
    InvalidReductionFactor {
        /// The offending factor.
        factor: usize,
    },

    /// The chunk capacity is zero.
    #[error("chunk capacity must be non-zero")]
    ZeroChunkCapacity,
}

/// Errors that can occur during series registration.
#[derive(Error, Debug)]
pub enum SeriesError {
    /// A series with this name is already registered.
    #[error("series '{name}' is already registered")]
    AlreadyExists {
        /// The conflicting series name.
        name: String,
    },
}

/// Errors that can occur during query operations (read path).
#[derive(Error, Debug)]
pub enum QueryError {
    /// The requested timestamp lies outside the stored span.
    #[error("timestamp {timestamp} is outside the stored span [{start}, {end}]")]
    OutOfRange {
        /// The requested timestamp.
        timestamp: f64,
        /// Start of the stored span.
        start: f64,
        /// End of the stored span.
        end: f64,
    },

    /// A single-sample query was issued against a series with no samples.
    #[error("series contains no samples")]
    EmptySeries,

    /// The requested bin width is zero, negative, or not finite.
    #[error("bin width {bin_width} is invalid")]
    InvalidBinWidth {
        /// The offending bin width.
        bin_width: f64,
    },
}

/// Errors that can occur in the chunked storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A new storage segment could not be allocated.
    ///
    /// This is fatal for the triggering push: the store never retries and
    /// never hands back partially aggregated data.
    #[error("failed to allocate a storage segment of {bytes} bytes: {source}")]
    AllocationFailed {
        /// The requested segment size in bytes.
        bytes: usize,
        /// The underlying reservation error.
        #[source]
        source: std::collections::TryReserveError,
    },
}

/// Type alias for `Result<T, StrataError>`.
pub type Result<T> = std::result::Result<T, StrataError>;
