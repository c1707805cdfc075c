//! Tests for anomaly derivation, tiling and aggregation

use super::*;
use crate::app::models::{AggregationWindow, Grid2D, GridAxes, GridSeriesBuilder};
use crate::app::services::anomaly::AnomalyCompositor;
use crate::error::ClimateError;
use ndarray::Array2;

#[test]
fn test_tiling_follows_cycle_position() {
    let clim = marker_climatology();
    let tiled = AnomalyCompositor::new(0)
        .tile_climatology(&clim, 0, 30)
        .unwrap();

    assert_eq!(tiled.len(), 30);
    for i in 0..30 {
        assert_eq!(tiled.get(i), Some(100.0 * ((i % 12) + 1) as f64));
    }
}

#[test]
fn test_tiling_from_later_start_phase() {
    let clim = marker_climatology();
    let tiled = AnomalyCompositor::new(0)
        .tile_climatology(&clim, 11, 3)
        .unwrap();
    assert_eq!(tiled.get(0), Some(1200.0));
    assert_eq!(tiled.get(1), Some(100.0));
    assert!(AnomalyCompositor::new(0).tile_climatology(&clim, 12, 3).is_err());
}

#[test]
fn test_december_start_subtracts_december() {
    let clim = marker_climatology();
    let target = consecutive(month(2015, 12), vec![Some(1200.5), Some(100.5), Some(200.5)]);
    let anomalies = AnomalyCompositor::new(0).anomalize(&target, &clim).unwrap();

    assert_eq!(anomalies.len(), 3);
    for i in 0..3 {
        assert_eq!(anomalies.values().get(i), Some(0.5));
    }
    assert_eq!(anomalies.times()[1], month(2016, 1));
}

#[test]
fn test_gap_in_target_is_phase_misaligned() {
    let clim = marker_climatology();
    let target = series_on(
        vec![month(2016, 1), month(2016, 2), month(2016, 4)],
        vec![Some(1.0), Some(2.0), Some(3.0)],
    );
    let result = AnomalyCompositor::new(0).anomalize(&target, &clim);
    assert!(matches!(
        result,
        Err(ClimateError::PhaseMisaligned {
            index: 2,
            expected: 2,
            found: 3
        })
    ));
}

#[test]
fn test_masked_operands_propagate() {
    let clim = marker_climatology();
    let target = consecutive(month(2016, 1), vec![Some(150.0), None]);
    let anomalies = AnomalyCompositor::new(0).anomalize(&target, &clim).unwrap();
    assert_eq!(anomalies.values().get(0), Some(50.0));
    assert!(anomalies.mask()[1]);
}

#[test]
fn test_aggregate_masking_threshold() {
    // Seven of the twelve months contribute a value
    let values: Vec<Option<f64>> = (0..12)
        .map(|m| if m < 7 { Some(1.0) } else { None })
        .collect();
    let target = consecutive(month(2016, 1), values);
    let clim = marker_climatology();
    let year = AggregationWindow::annual(2016).unwrap();

    let lenient = AnomalyCompositor::new(6);
    let anomalies = lenient.anomalize(&target, &clim).unwrap();
    let composite = lenient.aggregate(&anomalies, &year).unwrap();
    assert_eq!(composite.count(), 7);
    assert!(composite.value().is_some());

    let strict = AnomalyCompositor::new(7);
    let composite = strict.aggregate(&anomalies, &year).unwrap();
    assert_eq!(composite.count(), 7);
    assert_eq!(composite.value(), None);
}

#[test]
fn test_aggregate_empty_window_is_insufficient() {
    let target = consecutive(month(2016, 1), vec![Some(1.0); 3]);
    let anomalies = AnomalyCompositor::new(0)
        .anomalize(&target, &marker_climatology())
        .unwrap();
    let result = AnomalyCompositor::new(0)
        .aggregate(&anomalies, &AggregationWindow::annual(2020).unwrap());
    assert!(matches!(result, Err(ClimateError::InsufficientData { .. })));
}

#[test]
fn test_winter_window_spans_year_boundary() {
    let clim = marker_climatology();
    let target = consecutive(
        month(2015, 11),
        vec![Some(1100.0), Some(1201.0), Some(103.0), Some(205.0), Some(300.0)],
    );
    let compositor = AnomalyCompositor::new(2);
    let anomalies = compositor.anomalize(&target, &clim).unwrap();
    let djf = compositor
        .aggregate(&anomalies, &AggregationWindow::months(2015, 12, 3).unwrap())
        .unwrap();

    assert_eq!(djf.times(), &[month(2015, 12), month(2016, 1), month(2016, 2)]);
    assert_eq!(djf.value(), Some(3.0));
}

#[test]
fn test_annual_series() {
    // 2016 complete, 2017 has only four months
    let values: Vec<Option<f64>> = (0..16).map(|i| Some(100.0 * ((i % 12) + 1) as f64 + 2.0)).collect();
    let target = consecutive(month(2016, 1), values);
    let compositor = AnomalyCompositor::new(6);
    let anomalies = compositor.anomalize(&target, &marker_climatology()).unwrap();
    let annual = compositor.annual_series(&anomalies).unwrap();

    assert_eq!(annual.len(), 2);
    assert_eq!(annual.get(0), Some(2.0));
    assert_eq!(annual.get(1), None);
    assert_eq!(annual.decimal_years(), vec![2016.0, 2017.0]);
}

#[test]
fn test_anomalize_grid_single_month() {
    let axes = GridAxes::new(vec![0.0, 10.0], vec![0.0, 90.0, 180.0]).unwrap();
    let mut builder = GridSeriesBuilder::new(axes.clone(), crate::app::models::Cadence::Monthly);
    for i in 0..24u32 {
        let field = MaskedArray::unmasked(Array2::from_elem((2, 3), (i % 12) as f64));
        builder.push(add_months(month(2000, 1), i).unwrap(), field).unwrap();
    }
    let series = builder.finish().unwrap();
    let clim = ClimatologyEngine::new(ReferencePeriod::years(2000, 2002).unwrap(), 1)
        .compute(&series)
        .unwrap();

    let mut mask = Array2::from_elem((2, 3), false);
    mask[[1, 2]] = true;
    let july = Grid2D::new(
        axes,
        MaskedArray::new(Array2::from_elem((2, 3), 8.5), mask).unwrap(),
    )
    .unwrap();

    let field = AnomalyCompositor::new(0).anomalize_grid(&july, 7, &clim).unwrap();
    assert_eq!(field.values().get((0, 0)), Some(2.5));
    assert!(field.is_masked(1, 2));
    assert_eq!(field.counts()[[1, 2]], 0);
    assert_eq!(field.to_grid().unwrap().shape(), (2, 3));

    assert!(AnomalyCompositor::new(0).anomalize_grid(&july, 13, &clim).is_err());
}

#[test]
fn test_grid_aggregate_and_axis_mismatch() {
    let axes = GridAxes::new(vec![0.0, 10.0], vec![0.0, 90.0]).unwrap();
    let mut builder = GridSeriesBuilder::new(axes, crate::app::models::Cadence::Monthly);
    for i in 0..24u32 {
        let field = MaskedArray::unmasked(Array2::from_elem((2, 2), (i / 12) as f64));
        builder.push(add_months(month(2000, 1), i).unwrap(), field).unwrap();
    }
    let series = builder.finish().unwrap();
    let clim = ClimatologyEngine::new(ReferencePeriod::years(2000, 2002).unwrap(), 1)
        .compute(&series)
        .unwrap();

    let compositor = AnomalyCompositor::new(6);
    let anomalies = compositor.anomalize(&series, &clim).unwrap();
    let second_year = compositor
        .aggregate(&anomalies, &AggregationWindow::annual(2001).unwrap())
        .unwrap();
    let grid = second_year.to_grid().unwrap();
    assert_eq!(grid.get(1, 1), Some(0.5));

    let other = crate::app::models::GridAxes::new(vec![0.0, 20.0], vec![0.0, 90.0]).unwrap();
    let july = Grid2D::new(other, MaskedArray::unmasked(Array2::zeros((2, 2)))).unwrap();
    assert!(matches!(
        compositor.anomalize_grid(&july, 7, &clim),
        Err(ClimateError::AxisMismatch { .. })
    ));
}
