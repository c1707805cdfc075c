//! Climatology result structure

use crate::app::models::{Cadence, GridAxes, MaskedArray, ReferencePeriod};
use ndarray::{Array, Axis, Dimension, RemoveAxis};

/// Per-phase mean and contributing-sample count
///
/// The leading axis is the phase within the cadence's cycle (calendar month
/// for monthly data). Entries are masked wherever the count does not exceed
/// the configured minimum number of years.
#[derive(Debug, Clone)]
pub struct ClimatologyField<D: Dimension> {
    pub(crate) label: String,
    pub(crate) cadence: Cadence,
    pub(crate) reference: ReferencePeriod,
    pub(crate) min_years: usize,
    pub(crate) means: MaskedArray<D>,
    pub(crate) counts: Array<usize, D>,
    pub(crate) axes: Option<GridAxes>,
}

impl<D: Dimension> ClimatologyField<D> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn reference(&self) -> ReferencePeriod {
        self.reference
    }

    pub fn min_years(&self) -> usize {
        self.min_years
    }

    /// Number of phases along the leading axis
    pub fn cycle_length(&self) -> usize {
        self.counts.shape()[0]
    }

    /// Phase index of each entry along the leading axis
    pub fn times(&self) -> Vec<usize> {
        (0..self.cycle_length()).collect()
    }

    pub fn values(&self) -> &MaskedArray<D> {
        &self.means
    }

    pub fn mask(&self) -> &Array<bool, D> {
        self.means.mask()
    }

    /// Contributing samples per phase and cell
    pub fn counts(&self) -> &Array<usize, D> {
        &self.counts
    }

    /// Copy of the source grid axes, if the source was gridded
    pub fn axes(&self) -> Option<&GridAxes> {
        self.axes.as_ref()
    }
}

impl<D: Dimension + RemoveAxis> ClimatologyField<D> {
    /// Climatology of a single phase, or `None` past the end of the cycle
    pub fn phase(&self, phase: usize) -> Option<MaskedArray<D::Smaller>> {
        if phase >= self.cycle_length() {
            return None;
        }
        MaskedArray::new(
            self.means.data().index_axis(Axis(0), phase).to_owned(),
            self.means.mask().index_axis(Axis(0), phase).to_owned(),
        )
        .ok()
    }
}
