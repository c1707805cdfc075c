//! Tests for the climatology engine

use super::*;
use crate::app::models::{Cadence, MaskedArray, ReferencePeriod, SeriesTimes, TimeSeries};
use crate::app::services::climatology::ClimatologyEngine;
use crate::config::AnalysisConfig;
use crate::error::ClimateError;
use ndarray::array;

fn engine(first_year: i32, end_year: i32, min_years: usize) -> ClimatologyEngine {
    ClimatologyEngine::new(ReferencePeriod::years(first_year, end_year).unwrap(), min_years)
}

#[test]
fn test_monthly_means_per_calendar_month() {
    // Month m of year y holds y * 100 + m
    let series = monthly_series(month(2000, 1), 36, |i| {
        Some((2000 + i / 12) as f64 * 100.0 + (i % 12) as f64)
    });
    let clim = engine(2000, 2003, 0).compute(&series).unwrap();

    assert_eq!(clim.cycle_length(), 12);
    assert_eq!(clim.times(), (0..12).collect::<Vec<_>>());
    assert_eq!(clim.values().get(0), Some(200100.0));
    assert_eq!(clim.values().get(11), Some(200111.0));
    assert_eq!(clim.counts()[5], 3);
    assert!(clim.axes().is_none());
}

#[test]
fn test_min_years_boundary_is_strict() {
    let series = monthly_series(month(2000, 1), 60, |_| Some(1.0));

    // Five contributing years per month
    let at_boundary = engine(2000, 2005, 5).compute(&series).unwrap();
    assert!(at_boundary.mask().iter().all(|&masked| masked));

    let above_boundary = engine(2000, 2005, 4).compute(&series).unwrap();
    assert!(above_boundary.mask().iter().all(|&masked| !masked));
}

#[test]
fn test_masked_samples_reduce_count() {
    // January of 2001 missing
    let series = monthly_series(month(2000, 1), 36, |i| if i == 12 { None } else { Some(2.0) });
    let clim = engine(2000, 2003, 2).compute(&series).unwrap();

    assert_eq!(clim.counts()[0], 2);
    assert!(clim.mask()[0]);
    assert_eq!(clim.counts()[1], 3);
    assert_eq!(clim.values().get(1), Some(2.0));
}

#[test]
fn test_reference_period_restricts_samples() {
    let series = monthly_series(month(1990, 1), 12 * 30, |i| Some(i as f64));
    let clim = engine(2000, 2002, 0).compute(&series).unwrap();

    // January 2000 and January 2001 are steps 120 and 132
    assert_eq!(clim.values().get(0), Some(126.0));
    assert_eq!(clim.reference(), ReferencePeriod::years(2000, 2002).unwrap());
}

#[test]
fn test_empty_reference_window_is_insufficient() {
    let series = monthly_series(month(1990, 1), 24, |_| Some(1.0));
    let result = engine(2000, 2010, 0).compute(&series);
    assert!(matches!(result, Err(ClimateError::InsufficientData { .. })));
}

#[test]
fn test_fully_masked_window_is_not_an_error() {
    let series = monthly_series(month(2000, 1), 12, |_| None);
    let clim = engine(2000, 2001, 0).compute(&series).unwrap();
    assert_eq!(clim.values().count_masked(), 12);
}

#[test]
fn test_daily_series_rejected() {
    let series = TimeSeries::new(
        "daily",
        Cadence::Daily,
        SeriesTimes::Dates(vec![month(2000, 1)]),
        MaskedArray::unmasked(array![1.0]),
    )
    .unwrap();
    let result = engine(2000, 2001, 0).compute(&series);
    assert!(matches!(result, Err(ClimateError::Configuration { .. })));
}

#[test]
fn test_annual_series_single_phase() {
    let series = TimeSeries::from_decimal_years(
        "polar",
        Cadence::Annual,
        vec![1999.0, 2000.0, 2001.0],
        vec![1.0, 3.0, 5.0],
    )
    .unwrap();
    let clim = engine(2000, 2002, 1).compute(&series).unwrap();
    assert_eq!(clim.cycle_length(), 1);
    assert_eq!(clim.values().get(0), Some(4.0));
}

#[test]
fn test_grid_climatology_keeps_axes() {
    let series = monthly_grid_series(month(1981, 1), 12 * 30, |i| (i % 12) as f64);
    let clim = ClimatologyEngine::from_config(&AnalysisConfig::default())
        .compute(&series)
        .unwrap();

    assert_eq!(clim.values().shape(), &[12, 2, 2]);
    assert_eq!(clim.axes(), Some(series.axes()));
    assert_eq!(clim.counts()[[3, 1, 1]], 30);
    assert_eq!(clim.values().get((3, 1, 1)), Some(3.0));

    let april = clim.phase(3).unwrap();
    assert_eq!(april.get((0, 0)), Some(3.0));
    assert!(clim.phase(12).is_none());
}
