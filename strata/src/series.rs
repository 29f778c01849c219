//! The abstract time-series capability consumed by producers and renderers.
//!
//! Ingestion plugins only call the push operations, on their own threads and
//! at their own cadence; the render layer only calls the read operations,
//! once per frame per visible series, with a bin width derived from the
//! current zoom level and an output buffer sized to the plot's pixel width.
//! Storage strategies (dense fixed-rate today, sparse variants later) plug
//! in behind this trait.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One display-ready point handed to the renderer for a single plot column.
///
/// For a query that lands exactly on per-sample resolution, `min`, `max`,
/// and `average` all equal the raw value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaySample {
    /// Start time of the bin this sample summarizes, in seconds.
    pub timestamp: f64,
    /// Minimum value within the bin.
    pub min: f64,
    /// Maximum value within the bin.
    pub max: f64,
    /// Mean value within the bin.
    pub average: f64,
}

impl DisplaySample {
    /// Creates a display sample.
    pub fn new(timestamp: f64, min: f64, max: f64, average: f64) -> Self {
        Self {
            timestamp,
            min,
            max,
            average,
        }
    }
}

/// A queryable stream of timestamped scalar samples.
///
/// All operations take `&self`: implementations guard their state internally
/// so a series can be shared between producer threads and the render thread
/// behind an `Arc`.
pub trait TimeSeries: Send + Sync {
    /// Appends one raw sample.
    ///
    /// # Errors
    ///
    /// Returns an error only if backing storage cannot grow; the series is
    /// unchanged in that case.
    fn push_sample(&self, value: f64) -> Result<()>;

    /// Appends a batch of raw samples in order.
    ///
    /// Produces exactly the final state of calling [`TimeSeries::push_sample`]
    /// for each value, but holds the series lock once for the whole batch.
    ///
    /// # Errors
    ///
    /// Returns an error if backing storage cannot grow; samples before the
    /// failing one remain appended.
    fn push_samples(&self, values: &[f64]) -> Result<()>;

    /// Returns the `(start, end)` time bounds of currently stored data.
    ///
    /// An empty series reports the degenerate span `(start, start)`.
    fn get_span(&self) -> (f64, f64);

    /// Resolves a single aggregate covering the bin that contains
    /// `timestamp`, at the coarsest resolution not exceeding `bin_width`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::QueryError::OutOfRange`] if `timestamp` falls
    /// outside the stored span, and
    /// [`crate::error::QueryError::EmptySeries`] if nothing has been pushed.
    fn get_sample(&self, timestamp: f64, bin_width: f64) -> Result<DisplaySample>;

    /// Fills `out` with consecutive aggregates of width `bin_width` starting
    /// at the bin containing `timestamp_start`, returning how many were
    /// written.
    ///
    /// Running past the end of stored data is the normal "not enough history
    /// yet" case and yields a short count, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::QueryError::InvalidBinWidth`] if `bin_width`
    /// is not a positive finite number.
    fn get_samples(
        &self,
        timestamp_start: f64,
        bin_width: f64,
        out: &mut [DisplaySample],
    ) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_sample_serializes() {
        let sample = DisplaySample::new(1.5, -2.0, 4.0, 0.75);
        let json = serde_json::to_string(&sample).unwrap();
        let back: DisplaySample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, back);
    }

    #[test]
    fn test_display_sample_default_is_zeroed() {
        let sample = DisplaySample::default();
        assert_eq!(sample.timestamp, 0.0);
        assert_eq!(sample.min, 0.0);
        assert_eq!(sample.max, 0.0);
        assert_eq!(sample.average, 0.0);
    }
}
