//! Resolution pyramid for strata time-series storage.
//!
//! This module implements the aggregation structure that keeps query cost
//! independent of how many samples have ever been pushed. Level 0 holds one
//! aggregate per raw sample; every coarser level holds aggregates that each
//! summarize `k` consecutive bins of the level below.
//!
//! # Carry propagation
//!
//! ```text
//! level 2:             [0..4)                      <- sealed when level 1 seals its 2nd bin
//! level 1:     [0..2)          [2..4)
//! level 0:  [0]   [1]       [2]   [3]   [4]        <- one bin per raw sample
//! ```
//!
//! Appending a sample seals a level-0 bin immediately; whenever a level's
//! length reaches a multiple of `k`, its newest `k` bins are folded into one
//! bin of the parent level. The cascade is the same shape as carry
//! propagation in a base-`k` counter, so the work per pushed sample is
//! amortized O(1) across the whole pyramid.
//!
//! No partial bins are materialized above level 0: a coarse bin exists only
//! once all of its underlying samples have arrived. Range reductions cover
//! the unsealed remainder by descending to finer levels.

use crate::chunk::ChunkedBuffer;
use crate::error::Result;

/// Aggregate summary of a contiguous run of finer-grained values.
///
/// The element count is implicit: a bin at level `i` covers `k^i` raw
/// samples (except a tail bin clipped by the end of the data, which only
/// arises transiently during reduction, never in storage).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateBin {
    /// Sum of the covered values.
    pub sum: f64,
    /// Minimum of the covered values.
    pub min: f64,
    /// Maximum of the covered values.
    pub max: f64,
}

impl AggregateBin {
    /// Creates a bin summarizing a single value.
    pub fn from_value(value: f64) -> Self {
        Self {
            sum: value,
            min: value,
            max: value,
        }
    }

    /// Returns the combined summary of two bins.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// The ordered stack of aggregation levels for one dense series.
///
/// Level 0 is per-sample; level `i + 1` reduces `factor` consecutive level-`i`
/// bins into one. The pyramid is append-only: bins are never mutated after
/// they are sealed, and no deletion or truncation exists.
#[derive(Debug, Clone)]
pub struct Pyramid {
    /// Aggregation levels, finest first.
    levels: Vec<ChunkedBuffer<AggregateBin>>,
    /// Number of child bins folded into each parent bin.
    factor: usize,
    /// Segment capacity used for every level's buffer.
    chunk_capacity: usize,
}

impl Pyramid {
    /// Creates an empty pyramid.
    ///
    /// `factor` must already be validated (>= 2) by the configuration layer.
    pub fn new(factor: usize, chunk_capacity: usize) -> Self {
        Self {
            levels: Vec::new(),
            factor,
            chunk_capacity,
        }
    }

    /// Returns the reduction factor `k`.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Returns the number of raw samples pushed so far.
    pub fn sample_count(&self) -> usize {
        self.levels.first().map_or(0, ChunkedBuffer::len)
    }

    /// Returns the number of levels currently materialized.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Returns the number of sealed bins at `level`.
    pub fn level_len(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, ChunkedBuffer::len)
    }

    /// Appends one raw sample and propagates carries upward.
    ///
    /// All storage needed by the cascade is reserved before the first bin is
    /// written, so a returned error means nothing was appended and the
    /// pyramid is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::AllocationFailed`] if a storage
    /// segment cannot be allocated.
    pub fn push(&mut self, value: f64) -> Result<()> {
        self.reserve_cascade()?;

        // Infallible from here: every touched level has a reserved slot.
        self.levels[0].push(AggregateBin::from_value(value))?;

        let mut level = 0;
        while self.levels[level].len() % self.factor == 0 {
            let len = self.levels[level].len();
            let begin = len - self.factor;

            let mut merged = match self.levels[level].get(begin) {
                Some(bin) => *bin,
                None => break,
            };
            for offset in begin + 1..len {
                if let Some(bin) = self.levels[level].get(offset) {
                    merged = merged.merge(bin);
                }
            }

            self.levels[level + 1].push(merged)?;
            level += 1;
        }

        Ok(())
    }

    /// Reserves storage for every level the next push will append to.
    ///
    /// Walks the same cascade the push will take: level 0 always receives a
    /// bin; level `i + 1` receives one exactly when level `i`'s new length
    /// is a multiple of the factor.
    fn reserve_cascade(&mut self) -> Result<()> {
        let mut level = 0;
        loop {
            if level == self.levels.len() {
                self.levels
                    .push(ChunkedBuffer::with_chunk_capacity(self.chunk_capacity));
            }
            self.levels[level].reserve_one()?;

            if (self.levels[level].len() + 1) % self.factor != 0 {
                return Ok(());
            }
            level += 1;
        }
    }

    /// Reduces the raw sample index range `[begin, end)` to one aggregate.
    ///
    /// The walk greedily consumes the coarsest sealed bin that is aligned at
    /// the current position and fits inside the remaining range, so the
    /// number of bins visited is O(k · log_k(end - begin)) rather than
    /// proportional to the range length.
    ///
    /// Returns the merged aggregate and the number of raw samples covered,
    /// or `None` for an empty or out-of-bounds range.
    pub fn reduce(&self, begin: usize, end: usize) -> Option<(AggregateBin, usize)> {
        self.reduce_counting(begin, end)
            .map(|(bin, samples, _)| (bin, samples))
    }

    /// Reduction walk that also reports how many bins were visited.
    ///
    /// The visit count is the work bound checked by tests; callers outside
    /// this module use [`Pyramid::reduce`].
    fn reduce_counting(&self, begin: usize, end: usize) -> Option<(AggregateBin, usize, usize)> {
        if begin >= end || end > self.sample_count() {
            return None;
        }

        let mut acc: Option<AggregateBin> = None;
        let mut visited = 0usize;
        let mut index = begin;

        while index < end {
            // Grow the stride while a coarser sealed bin is aligned here and
            // fully contained in the remaining range.
            let mut level = 0;
            let mut stride = 1usize;
            loop {
                let Some(next) = stride.checked_mul(self.factor) else {
                    break;
                };
                let parent_sealed = self
                    .levels
                    .get(level + 1)
                    .is_some_and(|coarser| index / next < coarser.len());
                if index % next == 0 && index + next <= end && parent_sealed {
                    stride = next;
                    level += 1;
                } else {
                    break;
                }
            }

            let bin = self.levels.get(level)?.get(index / stride)?;
            visited += 1;
            acc = Some(match acc {
                Some(prior) => prior.merge(bin),
                None => *bin,
            });
            index += stride;
        }

        acc.map(|bin| (bin, end - begin, visited))
    }
}
