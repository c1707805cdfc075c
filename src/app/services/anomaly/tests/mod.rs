//! Test utilities for the anomaly compositor

use chrono::NaiveDate;
use ndarray::Array1;

use crate::app::models::calendar::add_months;
use crate::app::models::{Cadence, MaskedArray, ReferencePeriod, SeriesTimes, TimeSeries};
use crate::app::services::climatology::{ClimatologyEngine, ClimatologyField};

mod compositor_tests;

pub fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// Monthly scalar series with explicit dates
pub fn series_on(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> TimeSeries {
    let data = Array1::from_iter(values.iter().map(|v| v.unwrap_or(f64::NAN)));
    let mask = Array1::from_iter(values.iter().map(|v| v.is_none()));
    TimeSeries::new(
        "synthetic",
        Cadence::Monthly,
        SeriesTimes::Dates(dates),
        MaskedArray::new(data, mask).unwrap(),
    )
    .unwrap()
}

/// Consecutive monthly series starting at `start`
pub fn consecutive(start: NaiveDate, values: Vec<Option<f64>>) -> TimeSeries {
    let dates = (0..values.len())
        .map(|i| add_months(start, i as u32).unwrap())
        .collect();
    series_on(dates, values)
}

/// Climatology where calendar month `m` (0-based) holds the marker `100 * (m + 1)`
pub fn marker_climatology() -> ClimatologyField<ndarray::Ix1> {
    let reference = consecutive(
        month(2000, 1),
        (0..12).map(|m| Some(100.0 * (m + 1) as f64)).collect(),
    );
    ClimatologyEngine::new(ReferencePeriod::years(2000, 2001).unwrap(), 0)
        .compute(&reference)
        .unwrap()
}
