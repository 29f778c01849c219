//! Configuration types for strata dense series.
//!
//! A dense series is fixed at creation time: its start timestamp, sample
//! interval, pyramid reduction factor, and storage segment capacity never
//! change for the series' lifetime. Validation happens once, up front, so
//! the push and query paths can assume well-formed parameters.

use serde::{Deserialize, Serialize};

use crate::chunk::DEFAULT_CHUNK_CAPACITY;
use crate::error::{ConfigError, Result};

/// Default pyramid reduction factor (bins folded per parent bin).
pub const DEFAULT_REDUCTION_FACTOR: usize = 2;

/// Configuration for a dense, fixed-rate time series.
///
/// # Example
///
/// ```rust
/// use strata::DenseConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Audio envelope: 44.1 kHz samples starting at t = 0.
/// let config = DenseConfig::new(0.0, 1.0 / 44_100.0);
/// config.validate()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DenseConfig {
    /// Timestamp of the first sample, in seconds.
    pub start: f64,

    /// Seconds between consecutive samples.
    ///
    /// Samples carry no stored timestamp; sample `i` is implicitly at
    /// `start + i * interval`.
    pub interval: f64,

    /// Number of child bins folded into each parent pyramid bin.
    ///
    /// Smaller factors give finer-grained zoom levels at the cost of more
    /// levels; 2 matches the classic binary pyramid.
    #[serde(default = "default_reduction_factor")]
    pub reduction_factor: usize,

    /// Elements per storage segment in every pyramid level.
    #[serde(default = "default_chunk_capacity")]
    pub chunk_capacity: usize,
}

fn default_reduction_factor() -> usize {
    DEFAULT_REDUCTION_FACTOR
}

fn default_chunk_capacity() -> usize {
    DEFAULT_CHUNK_CAPACITY
}

impl DenseConfig {
    /// Creates a configuration with default factor and segment capacity.
    pub fn new(start: f64, interval: f64) -> Self {
        Self {
            start,
            interval,
            reduction_factor: DEFAULT_REDUCTION_FACTOR,
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the start is not finite, the interval is
    /// not a finite positive number, the reduction factor is below 2, or
    /// the chunk capacity is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() {
            return Err(ConfigError::NonFiniteStart { start: self.start }.into());
        }

        if !self.interval.is_finite() {
            return Err(ConfigError::InvalidInterval {
                interval: self.interval,
                reason: "must be finite".to_string(),
            }
            .into());
        }
        if self.interval <= 0.0 {
            return Err(ConfigError::InvalidInterval {
                interval: self.interval,
                reason: "must be positive".to_string(),
            }
            .into());
        }

        if self.reduction_factor < 2 {
            return Err(ConfigError::InvalidReductionFactor {
                factor: self.reduction_factor,
            }
            .into());
        }

        if self.chunk_capacity == 0 {
            return Err(ConfigError::ZeroChunkCapacity.into());
        }

        Ok(())
    }
}
