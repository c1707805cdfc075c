//! Test utilities for the climatology engine

use chrono::NaiveDate;
use ndarray::{Array1, Array2};

use crate::app::models::calendar::add_months;
use crate::app::models::{
    Cadence, GridAxes, GridSeries, GridSeriesBuilder, MaskedArray, SeriesTimes, TimeSeries,
};

mod engine_tests;

pub fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// Monthly scalar series starting at `start` with values from `value(step)`
pub fn monthly_series<F>(start: NaiveDate, len: usize, value: F) -> TimeSeries
where
    F: Fn(usize) -> Option<f64>,
{
    let dates: Vec<NaiveDate> = (0..len)
        .map(|i| add_months(start, i as u32).unwrap())
        .collect();
    let raw: Vec<Option<f64>> = (0..len).map(&value).collect();
    let data = Array1::from_iter(raw.iter().map(|v| v.unwrap_or(f64::NAN)));
    let mask = Array1::from_iter(raw.iter().map(|v| v.is_none()));
    TimeSeries::new(
        "synthetic",
        Cadence::Monthly,
        SeriesTimes::Dates(dates),
        MaskedArray::new(data, mask).unwrap(),
    )
    .unwrap()
}

/// Monthly 2x2 grid series with every cell equal to `value(step)`
pub fn monthly_grid_series<F>(start: NaiveDate, len: usize, value: F) -> GridSeries
where
    F: Fn(usize) -> f64,
{
    let axes = GridAxes::new(vec![-45.0, 45.0], vec![0.0, 180.0]).unwrap();
    let mut builder = GridSeriesBuilder::new(axes, Cadence::Monthly);
    for i in 0..len {
        let field = MaskedArray::unmasked(Array2::from_elem((2, 2), value(i)));
        builder
            .push(add_months(start, i as u32).unwrap(), field)
            .unwrap();
    }
    builder.finish().unwrap()
}
