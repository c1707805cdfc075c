//! Anomaly derivation, climatology tiling and window aggregation

use tracing::{debug, info};

use super::composite::{Anomalies, AnomalyField, Composite};
use crate::app::models::{
    AggregationWindow, Cadence, Grid2D, MaskedArray, PeriodicData, SeriesTimes, TimeSeries,
};
use crate::app::services::climatology::ClimatologyField;
use crate::config::AnalysisConfig;
use crate::error::{ClimateError, Result};
use chrono::Datelike;
use ndarray::{Array1, Axis, Dimension, Ix1, Ix3, RemoveAxis};

/// Subtracts climatologies and averages anomalies over windows
///
/// An aggregate is trusted only when strictly more than `min_observations`
/// non-masked sub-periods contribute to it.
#[derive(Debug, Clone)]
pub struct AnomalyCompositor {
    min_observations: usize,
}

impl AnomalyCompositor {
    pub fn new(min_observations: usize) -> Self {
        Self { min_observations }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.min_aggregate_observations)
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    /// Repeat the climatology cycle from `start_phase` for `len` steps
    ///
    /// Step `i` holds the climatology of phase `(start_phase + i) mod cycle`.
    pub fn tile_climatology<D: Dimension + RemoveAxis>(
        &self,
        climatology: &ClimatologyField<D>,
        start_phase: usize,
        len: usize,
    ) -> Result<MaskedArray<D>> {
        let cycle = climatology.cycle_length();
        if start_phase >= cycle {
            return Err(ClimateError::axis_mismatch(format!(
                "start phase {} outside a cycle of {}",
                start_phase, cycle
            )));
        }
        let indices: Vec<usize> = (0..len).map(|i| (start_phase + i) % cycle).collect();
        Ok(climatology.values().select(Axis(0), &indices))
    }

    /// Subtract the matching climatology entry from every step of `target`
    ///
    /// The climatology is tiled from the phase of the target's first date. A
    /// step whose own phase differs from the tiled phase means the target has
    /// a gap and is reported as [`ClimateError::PhaseMisaligned`].
    pub fn anomalize<S: PeriodicData>(
        &self,
        target: &S,
        climatology: &ClimatologyField<S::Dim>,
    ) -> Result<Anomalies<S::Dim>> {
        let label = target.label();
        let cadence = target.cadence();
        if cadence != climatology.cadence() {
            return Err(ClimateError::axis_mismatch(format!(
                "{} is {} but the climatology is {}",
                label,
                cadence,
                climatology.cadence()
            )));
        }
        if target.axes() != climatology.axes() {
            return Err(ClimateError::axis_mismatch(format!(
                "{} and its climatology are on different grids",
                label
            )));
        }
        let data = target.data();
        if data.shape()[1..] != climatology.values().shape()[1..] {
            return Err(ClimateError::axis_mismatch(format!(
                "{} has cell shape {:?}, climatology has {:?}",
                label,
                &data.shape()[1..],
                &climatology.values().shape()[1..]
            )));
        }

        let dates = target.dates()?;
        let Some(&first) = dates.first() else {
            return Err(ClimateError::insufficient_data(format!(
                "{} has no steps to anomalize",
                label
            )));
        };

        let cycle = climatology.cycle_length();
        let start_phase = cadence.phase_of(first);
        for (index, &date) in dates.iter().enumerate() {
            let expected = (start_phase + index) % cycle;
            let found = cadence.phase_of(date);
            if found != expected {
                return Err(ClimateError::PhaseMisaligned {
                    index,
                    expected,
                    found,
                });
            }
        }

        let tiled = self.tile_climatology(climatology, start_phase, dates.len())?;
        let values = data.zip_with(&tiled, |value, normal| value - normal)?;
        debug!(
            "{}: anomalies for {} steps from phase {}, {} masked",
            label,
            dates.len(),
            start_phase,
            values.count_masked()
        );

        Ok(Anomalies {
            label,
            cadence,
            dates,
            values,
            axes: target.axes().cloned(),
        })
    }

    /// Anomaly of a single monthly grid against the climatology for `month`
    pub fn anomalize_grid(
        &self,
        grid: &Grid2D,
        month: u32,
        climatology: &ClimatologyField<Ix3>,
    ) -> Result<AnomalyField> {
        if climatology.axes() != Some(grid.axes()) {
            return Err(ClimateError::axis_mismatch(
                "grid and climatology are on different axes",
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(ClimateError::configuration(format!(
                "month {} outside 1..=12",
                month
            )));
        }
        let phase = match climatology.cadence() {
            Cadence::Monthly => (month - 1) as usize,
            Cadence::Annual | Cadence::Daily => 0,
        };
        let normal = climatology.phase(phase).ok_or_else(|| {
            ClimateError::axis_mismatch(format!("climatology has no phase {}", phase))
        })?;

        let values = grid.values().zip_with(&normal, |value, normal| value - normal)?;
        let counts = values.mask().mapv(|masked| usize::from(!masked));
        Ok(Composite {
            label: format!("{} month {}", climatology.label(), month),
            window: None,
            dates: Vec::new(),
            values,
            counts,
            axes: Some(grid.axes().clone()),
        })
    }

    /// Mean anomaly over the steps inside `window`
    ///
    /// Cells with `min_observations` or fewer contributing sub-periods are
    /// masked. A window selecting no step at all is an error.
    pub fn aggregate<D: Dimension + RemoveAxis>(
        &self,
        anomalies: &Anomalies<D>,
        window: &AggregationWindow,
    ) -> Result<Composite<D::Smaller>> {
        let indices: Vec<usize> = anomalies
            .dates
            .iter()
            .enumerate()
            .filter(|&(_, &date)| window.contains(date))
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return Err(ClimateError::insufficient_data(format!(
                "{} has no steps in window {}",
                anomalies.label, window
            )));
        }

        let (mut values, counts) = anomalies.values.select(Axis(0), &indices).mean_axis0();
        values.mask_where(&counts.mapv(|n| n <= self.min_observations))?;
        debug!(
            "{}: window {} selected {} steps, {} cells masked",
            anomalies.label,
            window,
            indices.len(),
            values.count_masked()
        );

        Ok(Composite {
            label: format!("{} {}", anomalies.label, window.label),
            window: Some(window.clone()),
            dates: indices.iter().map(|&i| anomalies.dates[i]).collect(),
            values,
            counts,
            axes: anomalies.axes.clone(),
        })
    }

    /// One aggregate per calendar year covered by a scalar anomaly series
    pub fn annual_series(&self, anomalies: &Anomalies<Ix1>) -> Result<TimeSeries> {
        let (Some(first), Some(last)) = (anomalies.dates.first(), anomalies.dates.last()) else {
            return Err(ClimateError::insufficient_data(format!(
                "{} has no steps to aggregate",
                anomalies.label
            )));
        };

        let mut years = Vec::new();
        let mut values = Vec::new();
        let mut mask = Vec::new();
        for year in first.year()..=last.year() {
            let window = AggregationWindow::annual(year)?;
            if !anomalies.dates.iter().any(|&date| window.contains(date)) {
                continue;
            }
            let composite = self.aggregate(anomalies, &window)?;
            years.push(year as f64);
            match composite.value() {
                Some(value) => {
                    values.push(value);
                    mask.push(false);
                }
                None => {
                    values.push(f64::NAN);
                    mask.push(true);
                }
            }
        }

        info!(
            "{}: {} annual means, {} masked",
            anomalies.label,
            years.len(),
            mask.iter().filter(|&&m| m).count()
        );
        TimeSeries::new(
            format!("{} annual", anomalies.label),
            Cadence::Annual,
            SeriesTimes::DecimalYears(years),
            MaskedArray::new(Array1::from(values), Array1::from(mask))?,
        )
    }
}
