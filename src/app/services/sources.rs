//! Parser presets for the supported observation products
//!
//! Each product has a fixed layout: header sizes, grid definitions and
//! sentinels are properties of the source rather than something inferred from
//! the file, so they are collected here.

use crate::app::models::GridAxes;
use crate::app::services::missing_value::SentinelRule;
use crate::app::services::text_parsers::{
    GridTextConfig, GridTextParser, MonthlyBlockConfig, MonthlyBlockParser, SeriesLayout,
    SeriesTextParser, TimeLayout,
};
use crate::constants::{
    AAO_HEADER_LINES, AO_HEADER_LINES, CARBON_MONOXIDE_HEADER_LINES, GRID_MISSING_THRESHOLD,
    HADSLP_GRID_SPACING, HADSLP_LATITUDES, HADSLP_LONGITUDES, MONTHS_PER_YEAR, NAO_HEADER_LINES,
    OZONE_HEADER_LINES, OZONE_LATITUDE_SPACING, OZONE_LATITUDES, OZONE_LONGITUDE_SPACING,
    OZONE_LONGITUDES, POLAR_OZONE_HEADER_LINES, SERIES_MISSING_THRESHOLD, SNAO_HEADER_LINES,
    SOI_HEADER_LINES, WINTER_NAO_HEADER_LINES,
};
use crate::error::Result;

// =============================================================================
// Gridded Products
// =============================================================================

/// Cell centres of the total column ozone grid: 89.5S..89.5N by 0.625E..359.375E
pub fn ozone_grid_axes() -> Result<GridAxes> {
    GridAxes::regular(
        -90.0 + OZONE_LATITUDE_SPACING / 2.0,
        OZONE_LATITUDE_SPACING,
        OZONE_LATITUDES,
        OZONE_LONGITUDE_SPACING / 2.0,
        OZONE_LONGITUDE_SPACING,
        OZONE_LONGITUDES,
    )
}

/// Total column ozone anomaly dump
pub fn ozone_grid_parser() -> GridTextParser {
    GridTextParser::new(
        GridTextConfig::new("total column ozone", OZONE_HEADER_LINES)
            .with_sentinel(SentinelRule::AtOrBelow(GRID_MISSING_THRESHOLD)),
    )
}

/// HadSLP2 grid: 90S..90N by 177.5W..177.5E, latitudes ascending
pub fn hadslp_axes() -> Result<GridAxes> {
    GridAxes::regular(
        -90.0,
        HADSLP_GRID_SPACING,
        HADSLP_LATITUDES,
        -180.0 + HADSLP_GRID_SPACING / 2.0,
        HADSLP_GRID_SPACING,
        HADSLP_LONGITUDES,
    )
}

/// HadSLP2 monthly archive: `year month` headers, rows are latitude bands
/// from north to south, values in hundredths of a hectopascal
pub fn hadslp_parser() -> Result<MonthlyBlockParser> {
    Ok(MonthlyBlockParser::new(MonthlyBlockConfig::new(
        "HadSLP2",
        hadslp_axes()?,
    )))
}

// =============================================================================
// Index Time Series
// =============================================================================

/// Annual polar ozone means: `year value`
pub fn polar_ozone_parser() -> SeriesTextParser {
    SeriesTextParser::new(SeriesLayout::new(
        "polar ozone",
        TimeLayout::Year,
        POLAR_OZONE_HEADER_LINES,
    ))
}

/// Monthly carbon monoxide burden: `year month value`
pub fn carbon_monoxide_parser() -> SeriesTextParser {
    SeriesTextParser::new(SeriesLayout::new(
        "CO burden",
        TimeLayout::YearMonth,
        CARBON_MONOXIDE_HEADER_LINES,
    ))
}

/// Arctic Oscillation: `year month value`
pub fn ao_parser() -> SeriesTextParser {
    SeriesTextParser::new(SeriesLayout::new("AO", TimeLayout::YearMonth, AO_HEADER_LINES))
}

/// Antarctic Oscillation: `year month value`
pub fn aao_parser() -> SeriesTextParser {
    SeriesTextParser::new(SeriesLayout::new(
        "AAO",
        TimeLayout::YearMonth,
        AAO_HEADER_LINES,
    ))
}

/// Southern Oscillation Index: one row per year with twelve monthly columns;
/// the current year is usually incomplete
pub fn soi_parser() -> SeriesTextParser {
    SeriesTextParser::new(
        SeriesLayout::new(
            "SOI",
            TimeLayout::YearWithPeriodColumns {
                periods: MONTHS_PER_YEAR,
            },
            SOI_HEADER_LINES,
        )
        .with_footer_recovery(true),
    )
}

/// Station-based NAO: `year DJF ...`, reading the winter column
pub fn nao_parser() -> SeriesTextParser {
    SeriesTextParser::new(SeriesLayout::new("NAO", TimeLayout::Year, NAO_HEADER_LINES))
}

/// Summer NAO: the index is the third column
pub fn snao_parser() -> SeriesTextParser {
    SeriesTextParser::new(
        SeriesLayout::new("SNAO", TimeLayout::Year, SNAO_HEADER_LINES).with_value_column(1),
    )
}

/// Label of a winter season, e.g. `2015/16`
pub fn winter_label(season_start_year: i32) -> String {
    format!(
        "{}/{:02}",
        season_start_year,
        (season_start_year + 1).rem_euclid(100)
    )
}

fn winter_nao_layout(season_start_year: i32, value_column: usize) -> SeriesLayout {
    SeriesLayout::new(
        winter_label(season_start_year),
        TimeLayout::MonthDay { season_start_year },
        WINTER_NAO_HEADER_LINES,
    )
    .with_value_column(value_column)
    .with_sentinel(Some(SentinelRule::AtOrBelow(SERIES_MISSING_THRESHOLD)))
}

/// Daily winter NAO index: `month day index smoothed`
pub fn winter_nao_parser(season_start_year: i32) -> SeriesTextParser {
    SeriesTextParser::new(winter_nao_layout(season_start_year, 0))
}

/// Smoothed column of the daily winter NAO file
pub fn winter_nao_smoothed_parser(season_start_year: i32) -> SeriesTextParser {
    SeriesTextParser::new(winter_nao_layout(season_start_year, 1))
}
