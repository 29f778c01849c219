//! # strata
//!
//! Embedded multi-resolution time-series storage for streaming plot data.
//!
//! strata is a Rust library for storing a continuous, possibly unbounded
//! stream of fixed-rate scalar samples while answering "give me N display
//! points covering time range \[a, b\] at bin width w" in time independent
//! of how many samples have ever been pushed. It exists so a plotting
//! front end can render arbitrarily long recordings at interactive frame
//! rates without ever materializing the raw series for a query.
//!
//! ## Key Properties
//!
//! - Append-only chunked storage — elements never relocate, growth never
//!   copies history
//! - Incremental resolution pyramid — a binary-counter carry cascade keeps
//!   per-push work amortized O(1)
//! - Query cost bounded by output size, not by ingested sample count
//! - Min/max preserved at every zoom level — decimation never hides extrema
//! - One lock per series; producers and the render thread share it through
//!   an `Arc`
//!
//! ## Quick Start
//!
//! ```rust
//! use strata::{DenseConfig, DenseSeries, DisplaySample};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 10 Hz series starting at t = 0.
//! let series = DenseSeries::new(DenseConfig::new(0.0, 0.1))?;
//!
//! // Producer side: push samples as they arrive.
//! series.push_samples(&[1.0, 2.0, 3.0, 4.0, 5.0])?;
//!
//! // Consumer side: one aggregate per plot column.
//! let mut columns = vec![DisplaySample::default(); 800];
//! let (start, end) = series.get_span();
//! let bin_width = (end - start) / columns.len() as f64;
//! let written = series.get_samples(start, bin_width.max(series.interval()), &mut columns)?;
//! assert!(written <= columns.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`DenseSeries`] — fixed-rate series owning a resolution pyramid behind
//!   one mutex
//! - [`TimeSeries`] — the capability trait producers and consumers program
//!   against
//! - [`SeriesRegistry`] — name → shared series map connecting the two sides
//! - [`DisplaySample`] — the `{timestamp, min, max, average}` unit handed
//!   to the renderer
//!
//! ## Modules
//!
//! For lower-level access, the individual modules are also public:
//!
//! - [`dense`] — the dense series store
//! - [`pyramid`] — aggregate bins, carry propagation, range reduction
//! - [`chunk`] — chunked append-only storage arena
//! - [`sampler`] — display-column partition planner
//! - [`registry`] — series registration and lookup
//! - [`config`] — series configuration and validation
//! - [`error`] — error types

pub mod chunk;
pub mod config;
pub mod dense;
pub mod error;
pub mod pyramid;
pub mod registry;
pub mod sampler;
pub mod series;

// Re-export primary API types at crate root for convenience.
pub use config::DenseConfig;
pub use dense::DenseSeries;
pub use error::{Result, StrataError};
pub use registry::SeriesRegistry;
pub use series::{DisplaySample, TimeSeries};
