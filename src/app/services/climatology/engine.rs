//! Climatology computation over a reference period

use tracing::{debug, info};

use super::field::ClimatologyField;
use crate::app::models::{MaskedArray, PeriodicData, ReferencePeriod};
use crate::config::AnalysisConfig;
use crate::error::{ClimateError, Result};
use ndarray::{Array, Axis};

/// Computes per-phase means over a reference period
///
/// A phase/cell is trusted only when strictly more than `min_years` samples
/// contribute to it; a count of exactly `min_years` is masked.
#[derive(Debug, Clone)]
pub struct ClimatologyEngine {
    reference: ReferencePeriod,
    min_years: usize,
}

impl ClimatologyEngine {
    pub fn new(reference: ReferencePeriod, min_years: usize) -> Self {
        Self {
            reference,
            min_years,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.reference, config.min_climatology_years)
    }

    pub fn reference(&self) -> ReferencePeriod {
        self.reference
    }

    pub fn min_years(&self) -> usize {
        self.min_years
    }

    /// Climatology of `series` over the engine's reference period
    ///
    /// Fails only when no timestamp falls inside the reference period.
    pub fn compute<S: PeriodicData>(&self, series: &S) -> Result<ClimatologyField<S::Dim>> {
        let label = series.label();
        let cadence = series.cadence();
        let cycle = cadence.cycle_length().ok_or_else(|| {
            ClimateError::configuration(format!(
                "{} has {} cadence, which has no climatology cycle",
                label, cadence
            ))
        })?;

        let dates = series.dates()?;
        let (indices, phases): (Vec<usize>, Vec<usize>) = dates
            .iter()
            .enumerate()
            .filter(|&(_, &date)| self.reference.contains(date))
            .map(|(i, &date)| (i, cadence.phase_of(date)))
            .unzip();
        if indices.is_empty() {
            return Err(ClimateError::insufficient_data(format!(
                "{} has no samples in reference period {}",
                label, self.reference
            )));
        }
        debug!(
            "{}: {} of {} steps inside {}",
            label,
            indices.len(),
            dates.len(),
            self.reference
        );

        let restricted = series.data().select(Axis(0), &indices);
        let mut dim = restricted.raw_dim();
        dim[0] = cycle;
        let mut means = Array::from_elem(dim.clone(), f64::NAN);
        let mut counts = Array::<usize, _>::zeros(dim);

        for phase in 0..cycle {
            let members: Vec<usize> = phases
                .iter()
                .enumerate()
                .filter(|&(_, &p)| p == phase)
                .map(|(i, _)| i)
                .collect();
            if members.is_empty() {
                continue;
            }
            let (mean, count) = restricted.select(Axis(0), &members).mean_axis0();
            means.index_axis_mut(Axis(0), phase).assign(mean.data());
            counts.index_axis_mut(Axis(0), phase).assign(&count);
        }

        let mask = counts.mapv(|n| n <= self.min_years);
        let means = MaskedArray::new(means, mask)?;
        info!(
            "Climatology for {} over {}: {} phases, {} of {} entries masked (min years {})",
            label,
            self.reference,
            cycle,
            means.count_masked(),
            means.len(),
            self.min_years
        );

        Ok(ClimatologyField {
            label,
            cadence,
            reference: self.reference,
            min_years: self.min_years,
            means,
            counts,
            axes: series.axes().cloned(),
        })
    }
}
