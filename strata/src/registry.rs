//! Series registration and lookup.
//!
//! The registry maps series names to shared [`TimeSeries`] handles so that
//! ingestion plugins (producers) and the render layer (consumer) can reach
//! the same series from different threads. Registration returns an `Arc`
//! that the producer keeps for its push loop; the consumer looks series up
//! by name each frame or iterates over all of them.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::DenseConfig;
use crate::dense::DenseSeries;
use crate::error::{Result, SeriesError};
use crate::series::TimeSeries;

/// Name-keyed collection of shared time series.
///
/// The registry itself uses `&mut self` for registration; callers that
/// register from multiple threads wrap it in their own lock. The series
/// handles it returns are internally synchronized and freely shareable.
#[derive(Default)]
pub struct SeriesRegistry {
    /// Registered series in name order.
    series: BTreeMap<String, Arc<dyn TimeSeries>>,
}

impl SeriesRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a dense series under `name`.
    ///
    /// Returns the concrete handle so the producer can push without going
    /// through the trait object.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::AlreadyExists`] if the name is taken, or a
    /// configuration error if `config` is invalid.
    pub fn register_dense(&mut self, name: &str, config: DenseConfig) -> Result<Arc<DenseSeries>> {
        if self.series.contains_key(name) {
            return Err(SeriesError::AlreadyExists {
                name: name.to_string(),
            }
            .into());
        }

        let series = Arc::new(DenseSeries::new(config)?);
        self.series
            .insert(name.to_string(), Arc::clone(&series) as Arc<dyn TimeSeries>);
        Ok(series)
    }

    /// Registers an externally constructed series under `name`.
    ///
    /// This is how alternative storage strategies join the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::AlreadyExists`] if the name is taken.
    pub fn register(&mut self, name: &str, series: Arc<dyn TimeSeries>) -> Result<()> {
        if self.series.contains_key(name) {
            return Err(SeriesError::AlreadyExists {
                name: name.to_string(),
            }
            .into());
        }
        self.series.insert(name.to_string(), series);
        Ok(())
    }

    /// Looks up a series by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn TimeSeries>> {
        self.series.get(name).map(Arc::clone)
    }

    /// Returns the number of registered series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterates over `(name, series)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn TimeSeries>)> {
        self.series.iter().map(|(name, series)| (name.as_str(), series))
    }
}

impl std::fmt::Debug for SeriesRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesRegistry")
            .field("names", &self.series.keys().collect::<Vec<_>>())
            .finish()
    }
}
