//! Data models for climatology processing
//!
//! This module contains the value types shared by the parsers, the climatology
//! engine and the anomaly compositor: masked arrays, grids, scalar series and
//! the calendar windows used to restrict them.

pub mod calendar;
pub mod grid;
pub mod masked;
pub mod periods;
pub mod series;

pub use calendar::{Cadence, date_from_decimal_year, days_since, decimal_year};
pub use grid::{Grid2D, GridAxes, GridSeries, GridSeriesBuilder, LatitudeOrder, LongitudeConvention};
pub use masked::MaskedArray;
pub use periods::{AggregationWindow, ReferencePeriod};
pub use series::{SeriesTimes, TimeSeries};

use crate::Result;
use chrono::NaiveDate;
use ndarray::{Dimension, Ix1, Ix3, RemoveAxis};

// =============================================================================
// Periodic Data Abstraction
// =============================================================================

/// Chronologically ordered data whose leading axis is time
///
/// Implemented by [`GridSeries`] (`(time, lat, lon)`) and [`TimeSeries`]
/// (`(time,)`) so climatologies and anomalies are computed by one code path.
pub trait PeriodicData {
    /// Dimension of the data including the leading time axis
    type Dim: Dimension + RemoveAxis;

    fn cadence(&self) -> Cadence;

    /// Calendar date of every step along the time axis
    fn dates(&self) -> Result<Vec<NaiveDate>>;

    fn data(&self) -> &MaskedArray<Self::Dim>;

    /// Spatial axes, if the data is gridded
    fn axes(&self) -> Option<&GridAxes>;

    /// Display label used in log output
    fn label(&self) -> String;
}

impl PeriodicData for GridSeries {
    type Dim = Ix3;

    fn cadence(&self) -> Cadence {
        GridSeries::cadence(self)
    }

    fn dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(GridSeries::dates(self))
    }

    fn data(&self) -> &MaskedArray<Ix3> {
        self.values()
    }

    fn axes(&self) -> Option<&GridAxes> {
        Some(GridSeries::axes(self))
    }

    fn label(&self) -> String {
        let (n_lat, n_lon) = GridSeries::axes(self).shape();
        format!("grid series {}x{} ({})", n_lat, n_lon, self.time_units())
    }
}

impl PeriodicData for TimeSeries {
    type Dim = Ix1;

    fn cadence(&self) -> Cadence {
        TimeSeries::cadence(self)
    }

    fn dates(&self) -> Result<Vec<NaiveDate>> {
        TimeSeries::dates(self)
    }

    fn data(&self) -> &MaskedArray<Ix1> {
        self.values()
    }

    fn axes(&self) -> Option<&GridAxes> {
        None
    }

    fn label(&self) -> String {
        self.name().to_string()
    }
}
