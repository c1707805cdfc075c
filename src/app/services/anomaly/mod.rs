//! Anomalies relative to a climatology and their seasonal/annual composites
//!
//! Anomalies subtract the climatology entry whose phase matches each target
//! step, tiling the climatology cycle across targets longer than one cycle.
//! Composites average anomalies over an [`AggregationWindow`] and mask cells
//! whose window holds too few non-masked sub-periods.
//!
//! ## Architecture
//!
//! - [`compositor`] - the [`AnomalyCompositor`] operations
//! - [`composite`] - the [`Anomalies`] and [`Composite`] result structures
//!
//! ## Usage
//!
//! ```rust
//! use climatology_processor::app::models::{AggregationWindow, Cadence, ReferencePeriod, TimeSeries};
//! use climatology_processor::app::services::anomaly::AnomalyCompositor;
//! use climatology_processor::app::services::climatology::ClimatologyEngine;
//!
//! # fn example() -> climatology_processor::Result<()> {
//! let times: Vec<f64> = (0..36).map(|i| 2000.0 + i as f64 / 12.0).collect();
//! let values: Vec<f64> = (0..36).map(|i| (i % 12) as f64 + (i / 12) as f64).collect();
//! let series = TimeSeries::from_decimal_years("index", Cadence::Monthly, times, values)?;
//!
//! let climatology = ClimatologyEngine::new(ReferencePeriod::years(2000, 2003)?, 2).compute(&series)?;
//! let compositor = AnomalyCompositor::new(6);
//! let anomalies = compositor.anomalize(&series, &climatology)?;
//! let year = compositor.aggregate(&anomalies, &AggregationWindow::annual(2002)?)?;
//! assert_eq!(year.value(), Some(1.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! [`AggregationWindow`]: crate::app::models::AggregationWindow

pub mod composite;
pub mod compositor;

#[cfg(test)]
pub mod tests;

pub use composite::{Anomalies, AnomalyField, Composite};
pub use compositor::AnomalyCompositor;
