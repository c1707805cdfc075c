//! Anomaly and composite result structures

use crate::app::models::{AggregationWindow, Cadence, Grid2D, GridAxes, MaskedArray};
use crate::error::{ClimateError, Result};
use chrono::NaiveDate;
use ndarray::{Array, Dimension, Ix0, Ix2};

/// Target data minus the matching climatology entry, one step per target date
#[derive(Debug, Clone)]
pub struct Anomalies<D: Dimension> {
    pub(crate) label: String,
    pub(crate) cadence: Cadence,
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) values: MaskedArray<D>,
    pub(crate) axes: Option<GridAxes>,
}

impl<D: Dimension> Anomalies<D> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Calendar date of each step
    pub fn times(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &MaskedArray<D> {
        &self.values
    }

    pub fn mask(&self) -> &Array<bool, D> {
        self.values.mask()
    }

    pub fn axes(&self) -> Option<&GridAxes> {
        self.axes.as_ref()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Mean anomaly over a window, with the number of contributing sub-periods
///
/// `times()` lists the dates of the steps the window selected; a composite
/// built from a single undated grid has none.
#[derive(Debug, Clone)]
pub struct Composite<D: Dimension> {
    pub(crate) label: String,
    pub(crate) window: Option<AggregationWindow>,
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) values: MaskedArray<D>,
    pub(crate) counts: Array<usize, D>,
    pub(crate) axes: Option<GridAxes>,
}

/// Gridded anomaly for one period or one aggregation window
pub type AnomalyField = Composite<Ix2>;

impl<D: Dimension> Composite<D> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn window(&self) -> Option<&AggregationWindow> {
        self.window.as_ref()
    }

    pub fn times(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &MaskedArray<D> {
        &self.values
    }

    pub fn mask(&self) -> &Array<bool, D> {
        self.values.mask()
    }

    /// Contributing sub-periods per cell
    pub fn counts(&self) -> &Array<usize, D> {
        &self.counts
    }

    pub fn axes(&self) -> Option<&GridAxes> {
        self.axes.as_ref()
    }
}

impl Composite<Ix0> {
    /// Scalar composite value, `None` when masked
    pub fn value(&self) -> Option<f64> {
        self.values.get(())
    }

    pub fn count(&self) -> usize {
        self.counts[()]
    }
}

impl Composite<Ix2> {
    /// The composite as a grid over its source axes
    pub fn to_grid(&self) -> Result<Grid2D> {
        let axes = self.axes.clone().ok_or_else(|| {
            ClimateError::axis_mismatch(format!("composite '{}' has no grid axes", self.label))
        })?;
        Grid2D::new(axes, self.values.clone())
    }

    pub fn is_masked(&self, lat_index: usize, lon_index: usize) -> bool {
        self.values.is_masked((lat_index, lon_index))
    }
}
