//! Densely packed time series with a fixed sample rate.
//!
//! A [`DenseSeries`] accepts an unbounded stream of scalar samples at a
//! fixed interval and answers decimated range queries in time independent
//! of how many samples have ever been pushed. Samples carry no stored
//! timestamp; sample `i` lives at `start + i * interval`.
//!
//! # Locking
//!
//! The whole pyramid sits behind one mutex. Every public operation holds
//! it for its full duration, so a query can never observe a sealed child
//! bin whose parent update has not happened yet. Internal helpers take the
//! already-locked pyramid by reference and never re-acquire.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::DenseConfig;
use crate::error::{QueryError, Result};
use crate::pyramid::Pyramid;
use crate::series::{DisplaySample, TimeSeries};

/// Relative tolerance when matching a requested bin width against level
/// widths, so an exact multiple of the interval still selects its level
/// despite float representation noise.
const LEVEL_WIDTH_EPSILON: f64 = 1e-9;

/// A dense, append-only time series with multi-resolution aggregates.
///
/// # Example
///
/// ```rust
/// use strata::{DenseConfig, DenseSeries};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let series = DenseSeries::new(DenseConfig::new(0.0, 0.1))?;
/// series.push_samples(&[1.0, 2.0, 3.0, 4.0, 5.0])?;
///
/// assert_eq!(series.get_span(), (0.0, 0.4));
/// let sample = series.get_sample(0.25, 0.1)?;
/// assert_eq!(sample.average, 3.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DenseSeries {
    /// Timestamp of sample 0, fixed for the series' lifetime.
    start: f64,
    /// Seconds between consecutive samples, fixed for the series' lifetime.
    interval: f64,
    /// All aggregation state, guarded as one unit.
    pyramid: Mutex<Pyramid>,
}

impl DenseSeries {
    /// Creates an empty series from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError`] if the configuration is
    /// invalid.
    pub fn new(config: DenseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            start: config.start,
            interval: config.interval,
            pyramid: Mutex::new(Pyramid::new(config.reduction_factor, config.chunk_capacity)),
        })
    }

    /// Returns the timestamp of sample 0.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Returns the seconds between consecutive samples.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Returns the number of raw samples stored.
    pub fn sample_count(&self) -> usize {
        self.lock().sample_count()
    }

    /// Appends one raw sample.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::AllocationFailed`] if backing
    /// storage cannot grow; the series is unchanged in that case.
    pub fn push_sample(&self, value: f64) -> Result<()> {
        self.lock().push(value)
    }

    /// Appends a batch of raw samples in order, under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::AllocationFailed`] if backing
    /// storage cannot grow; samples before the failing one remain appended.
    pub fn push_samples(&self, values: &[f64]) -> Result<()> {
        let mut pyramid = self.lock();
        for &value in values {
            pyramid.push(value)?;
        }
        Ok(())
    }

    /// Returns the `(start, end)` time bounds of currently stored data.
    ///
    /// An empty series reports the degenerate span `(start, start)`.
    pub fn get_span(&self) -> (f64, f64) {
        self.span_of(&self.lock())
    }

    /// Resolves the single aggregate covering the bin that contains
    /// `timestamp`, at the coarsest level whose bin width does not exceed
    /// `bin_width`.
    ///
    /// # Errors
    ///
    /// - [`QueryError::EmptySeries`] if nothing has been pushed.
    /// - [`QueryError::OutOfRange`] if `timestamp` is outside the span.
    /// - [`QueryError::InvalidBinWidth`] if `bin_width` is not positive and
    ///   finite.
    pub fn get_sample(&self, timestamp: f64, bin_width: f64) -> Result<DisplaySample> {
        check_bin_width(bin_width)?;

        let pyramid = self.lock();
        let count = pyramid.sample_count();
        if count == 0 {
            return Err(QueryError::EmptySeries.into());
        }

        let (span_start, span_end) = self.span_of(&pyramid);
        if timestamp < span_start || timestamp > span_end {
            return Err(QueryError::OutOfRange {
                timestamp,
                start: span_start,
                end: span_end,
            }
            .into());
        }

        let stride = self.select_stride(&pyramid, bin_width);
        let index = self.index_at(timestamp).min(count - 1);
        let begin = index - index % stride;
        let end = (begin + stride).min(count);

        let (bin, samples) = pyramid
            .reduce(begin, end)
            .ok_or(QueryError::EmptySeries)?;
        Ok(self.display_sample(begin, &bin, samples))
    }

    /// Fills `out` with consecutive aggregates starting at the bin that
    /// contains `timestamp_start`, returning how many were written.
    ///
    /// A start before the span clamps to the first stored bin; walking past
    /// the end of stored data yields a short count. Neither is an error,
    /// and an empty series writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidBinWidth`] if `bin_width` is not
    /// positive and finite.
    pub fn get_samples(
        &self,
        timestamp_start: f64,
        bin_width: f64,
        out: &mut [DisplaySample],
    ) -> Result<usize> {
        check_bin_width(bin_width)?;
        if out.is_empty() {
            return Ok(0);
        }

        let pyramid = self.lock();
        let count = pyramid.sample_count();
        if count == 0 {
            return Ok(0);
        }

        let stride = self.select_stride(&pyramid, bin_width);
        let first = if timestamp_start <= self.start {
            0
        } else {
            self.index_at(timestamp_start)
        };
        let mut begin = first - first % stride;

        let mut written = 0;
        for slot in out.iter_mut() {
            if begin >= count {
                break;
            }
            let end = (begin + stride).min(count);
            let Some((bin, samples)) = pyramid.reduce(begin, end) else {
                break;
            };
            *slot = self.display_sample(begin, &bin, samples);
            written += 1;
            begin = end;
        }

        Ok(written)
    }

    /// Acquires the pyramid lock, recovering from poisoning.
    ///
    /// The guarded section performs no panicking operation once the first
    /// mutation lands, so an inherited poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, Pyramid> {
        self.pyramid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Span of the locked pyramid: degenerate `(start, start)` when empty.
    fn span_of(&self, pyramid: &Pyramid) -> (f64, f64) {
        let count = pyramid.sample_count();
        if count == 0 {
            return (self.start, self.start);
        }
        #[allow(clippy::cast_precision_loss)] // index magnitudes are far below 2^52
        let end = self.start + (count - 1) as f64 * self.interval;
        (self.start, end)
    }

    /// Raw sample index of the bin containing `timestamp` (callers clamp).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // The relative offset is validated non-negative and bounded by the span.
    fn index_at(&self, timestamp: f64) -> usize {
        ((timestamp - self.start) / self.interval).floor().max(0.0) as usize
    }

    /// Raw samples per display bin at the coarsest level whose bin width
    /// does not exceed `bin_width`, clamped to the deepest materialized
    /// level.
    ///
    /// Rounds down to the finer level when `bin_width` falls between two
    /// levels, so real extrema are never hidden by over-aggregation.
    fn select_stride(&self, pyramid: &Pyramid, bin_width: f64) -> usize {
        let factor = pyramid.factor();
        let mut stride = 1usize;
        let mut width = self.interval;
        let mut level = 0;

        while level + 1 < pyramid.depth() {
            #[allow(clippy::cast_precision_loss)] // factor is small
            let next_width = width * factor as f64;
            if next_width <= bin_width * (1.0 + LEVEL_WIDTH_EPSILON) {
                width = next_width;
                stride *= factor;
                level += 1;
            } else {
                break;
            }
        }
        stride
    }

    /// Builds the output unit for a reduced bin starting at raw index
    /// `begin`.
    fn display_sample(
        &self,
        begin: usize,
        bin: &crate::pyramid::AggregateBin,
        samples: usize,
    ) -> DisplaySample {
        #[allow(clippy::cast_precision_loss)] // index magnitudes are far below 2^52
        let timestamp = self.start + begin as f64 * self.interval;
        #[allow(clippy::cast_precision_loss)]
        let average = bin.sum / samples as f64;
        DisplaySample::new(timestamp, bin.min, bin.max, average)
    }
}

/// Rejects bin widths that are zero, negative, or not finite.
fn check_bin_width(bin_width: f64) -> Result<()> {
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(QueryError::InvalidBinWidth { bin_width }.into());
    }
    Ok(())
}

impl TimeSeries for DenseSeries {
    fn push_sample(&self, value: f64) -> Result<()> {
        DenseSeries::push_sample(self, value)
    }

    fn push_samples(&self, values: &[f64]) -> Result<()> {
        DenseSeries::push_samples(self, values)
    }

    fn get_span(&self) -> (f64, f64) {
        DenseSeries::get_span(self)
    }

    fn get_sample(&self, timestamp: f64, bin_width: f64) -> Result<DisplaySample> {
        DenseSeries::get_sample(self, timestamp, bin_width)
    }

    fn get_samples(
        &self,
        timestamp_start: f64,
        bin_width: f64,
        out: &mut [DisplaySample],
    ) -> Result<usize> {
        DenseSeries::get_samples(self, timestamp_start, bin_width, out)
    }
}
