//! Integration tests for the parse → climatology → anomaly pipeline
//!
//! These tests write synthetic files in the supported layouts to disk and
//! drive them through the public API end to end.

use climatology_processor::app::services::sources::{hadslp_axes, hadslp_parser, soi_parser};
use climatology_processor::{
    AggregationWindow, AnalysisConfig, AnomalyCompositor, ClimateError, ClimatologyEngine,
    ReferencePeriod,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Monthly HadSLP2-style archive covering `years` with a uniform field
///
/// Each month's field holds `base + month` hPa, plus `shift` hPa in `shift_year`.
fn write_hadslp_archive(years: std::ops::Range<i32>, shift_year: i32, shift: i32) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for year in years {
        for month in 1..=12 {
            writeln!(file, "{} {}", year, month).unwrap();
            let hpa = 1000 + month + if year == shift_year { shift } else { 0 };
            let row: Vec<String> = (0..72).map(|_| (hpa * 100).to_string()).collect();
            let row = row.join(" ");
            for _ in 0..37 {
                writeln!(file, "{}", row).unwrap();
            }
        }
    }
    file
}

/// Run a gridded monthly archive through climatology, anomalies and composites
///
/// Purpose: Validate the whole chain on a 5° grid over a 31-year record
/// Benefit: Ensures phases, masking thresholds and axes survive every stage
#[test]
fn test_hadslp_pipeline() {
    let file = write_hadslp_archive(1981..2012, 2011, 3);
    let series = hadslp_parser().unwrap().parse_file(file.path()).unwrap();
    assert_eq!(series.len(), 31 * 12);
    assert_eq!(series.axes(), &hadslp_axes().unwrap());
    assert_eq!(series.time_units(), "days since 1981-01-01 00:00:00");

    let config = AnalysisConfig::default();
    let climatology = ClimatologyEngine::from_config(&config).compute(&series).unwrap();
    assert_eq!(climatology.values().shape(), &[12, 37, 72]);
    assert_eq!(climatology.values().count_masked(), 0);

    let compositor = AnomalyCompositor::from_config(&config);
    let anomalies = compositor.anomalize(&series, &climatology).unwrap();

    let final_year = compositor
        .aggregate(&anomalies, &AggregationWindow::annual(2011).unwrap())
        .unwrap()
        .to_grid()
        .unwrap();
    assert!((final_year.get(18, 36).unwrap() - 3.0).abs() < 1e-9);

    let winter = compositor
        .aggregate(&anomalies, &AggregationWindow::months(2000, 12, 3).unwrap())
        .unwrap();
    // Only three months contribute, which is not more than six
    assert!(winter.mask().iter().all(|&masked| masked));
    assert!(winter.counts().iter().all(|&n| n == 3));

    let july = series.grid(series.len() - 6).unwrap();
    let field = compositor.anomalize_grid(&july, 7, &climatology).unwrap();
    assert!((field.values().get((0, 0)).unwrap() - 3.0).abs() < 1e-9);

    let arctic = final_year.restrict_latitudes(3.0, 90.0).unwrap();
    assert_eq!(arctic.axes().latitudes()[0], 5.0);
    assert_eq!(arctic.shape(), (18, 72));
}

/// Read an SOI table whose current year is incomplete
///
/// Purpose: Validate footer recovery through the file-based API
/// Benefit: Ensures the unfinished year is dropped and nothing else is
#[test]
fn test_soi_footer_recovery_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    for line in 0..9 {
        writeln!(file, "SOI plain text header {}", line).unwrap();
    }
    for year in 1981..2012 {
        let months: Vec<String> = (1..=12).map(|m| format!("{:.1}", (year - 1981) as f64 + m as f64 / 10.0)).collect();
        writeln!(file, "{} {}", year, months.join(" ")).unwrap();
    }
    writeln!(file, "2012 5.1 -3.2").unwrap();

    let soi = soi_parser().parse_file(file.path()).unwrap();
    assert_eq!(soi.len(), 31 * 12);

    let climatology = ClimatologyEngine::new(ReferencePeriod::years(1981, 2011).unwrap(), 15)
        .compute(&soi)
        .unwrap();
    let compositor = AnomalyCompositor::new(6);
    let anomalies = compositor.anomalize(&soi, &climatology).unwrap();
    let annual = compositor.annual_series(&anomalies).unwrap();
    assert_eq!(annual.len(), 31);
    // Year k sits k - 14.5 above the 1981-2010 mean
    assert!((annual.get(30).unwrap() - 15.5).abs() < 1e-9);
}

/// Reject a structurally broken archive
///
/// Purpose: Validate that parse errors are reported, not papered over
/// Benefit: Ensures corrupt input never reaches the climatology stage
#[test]
fn test_corrupt_archive_is_format_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "2016 1").unwrap();
    writeln!(file, "101325 101300").unwrap();

    let err = hadslp_parser().unwrap().parse_file(file.path()).unwrap_err();
    assert!(matches!(err, ClimateError::Format { .. }));
}
