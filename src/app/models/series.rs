//! Scalar time series
//!
//! A [`TimeSeries`] carries either fractional-year or calendar-date time
//! coordinates. Both are strictly increasing; the name is a display label.

use super::calendar::{Cadence, date_from_decimal_year, decimal_year};
use super::masked::MaskedArray;
use crate::error::{ClimateError, Result};
use chrono::NaiveDate;
use ndarray::{Array1, Axis, Ix1};
use tracing::debug;

/// Time coordinates of a scalar series
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesTimes {
    /// Fractional years such as `1951.0833` for February 1951
    DecimalYears(Vec<f64>),
    /// Calendar dates, used for daily indices
    Dates(Vec<NaiveDate>),
}

impl SeriesTimes {
    pub fn len(&self) -> usize {
        match self {
            SeriesTimes::DecimalYears(times) => times.len(),
            SeriesTimes::Dates(dates) => dates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_strictly_increasing(&self) -> bool {
        match self {
            SeriesTimes::DecimalYears(times) => times.windows(2).all(|w| w[0] < w[1]),
            SeriesTimes::Dates(dates) => dates.windows(2).all(|w| w[0] < w[1]),
        }
    }

    fn select(&self, indices: &[usize]) -> Self {
        match self {
            SeriesTimes::DecimalYears(times) => {
                SeriesTimes::DecimalYears(indices.iter().map(|&i| times[i]).collect())
            }
            SeriesTimes::Dates(dates) => {
                SeriesTimes::Dates(indices.iter().map(|&i| dates[i]).collect())
            }
        }
    }
}

/// Named scalar series with a validity mask
#[derive(Debug, Clone)]
pub struct TimeSeries {
    name: String,
    cadence: Cadence,
    times: SeriesTimes,
    values: MaskedArray<Ix1>,
}

impl TimeSeries {
    pub fn new(
        name: impl Into<String>,
        cadence: Cadence,
        times: SeriesTimes,
        values: MaskedArray<Ix1>,
    ) -> Result<Self> {
        let name = name.into();
        if times.len() != values.len() {
            return Err(ClimateError::axis_mismatch(format!(
                "series '{}' has {} times but {} values",
                name,
                times.len(),
                values.len()
            )));
        }
        if !times.is_strictly_increasing() {
            return Err(ClimateError::axis_mismatch(format!(
                "series '{}' times are not strictly increasing",
                name
            )));
        }
        Ok(Self {
            name,
            cadence,
            times,
            values,
        })
    }

    /// Series with fractional-year times and no masked entries
    pub fn from_decimal_years(
        name: impl Into<String>,
        cadence: Cadence,
        times: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self> {
        Self::new(
            name,
            cadence,
            SeriesTimes::DecimalYears(times),
            MaskedArray::unmasked(Array1::from(values)),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn times(&self) -> &SeriesTimes {
        &self.times
    }

    pub fn values(&self) -> &MaskedArray<Ix1> {
        &self.values
    }

    pub fn mask(&self) -> &Array1<bool> {
        self.values.mask()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index)
    }

    /// Fractional-year coordinate of every entry
    pub fn decimal_years(&self) -> Vec<f64> {
        match &self.times {
            SeriesTimes::DecimalYears(times) => times.clone(),
            SeriesTimes::Dates(dates) => dates
                .iter()
                .map(|&date| decimal_year(date, self.cadence))
                .collect(),
        }
    }

    /// Calendar date of every entry
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        match &self.times {
            SeriesTimes::Dates(dates) => Ok(dates.clone()),
            SeriesTimes::DecimalYears(times) => times
                .iter()
                .map(|&t| date_from_decimal_year(t, self.cadence))
                .collect(),
        }
    }

    /// Entries dated inside `[start, end)`
    pub fn restrict(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let indices: Vec<usize> = self
            .dates()?
            .into_iter()
            .enumerate()
            .filter(|&(_, date)| start <= date && date < end)
            .map(|(i, _)| i)
            .collect();
        debug!(
            "Restricted series '{}' to {}..{}: {} of {} entries",
            self.name,
            start,
            end,
            indices.len(),
            self.len()
        );
        Ok(Self {
            name: self.name.clone(),
            cadence: self.cadence,
            times: self.times.select(&indices),
            values: self.values.select(Axis(0), &indices),
        })
    }
}
