//! Application constants for the climatology processor
//!
//! This module contains sentinel thresholds, unit scales, header sizes, grid
//! definitions and default sufficiency thresholds for the observation
//! products read by the parsers.

// =============================================================================
// Missing Value Sentinels
// =============================================================================

/// Gridded ozone dumps mark missing cells at or below this value
pub const GRID_MISSING_THRESHOLD: f64 = -999.0;

/// Index time series and derived pressure series mark missing entries at or below this value
pub const SERIES_MISSING_THRESHOLD: f64 = -99.99;

// =============================================================================
// Monthly Block Archives (HadSLP2)
// =============================================================================

/// Stored values are hundredths of a hectopascal
pub const CENTI_UNIT_DIVISOR: f64 = 100.0;

/// HadSLP2 grid spacing in degrees
pub const HADSLP_GRID_SPACING: f64 = 5.0;

/// Latitude bands in a HadSLP2 block (90S..90N inclusive)
pub const HADSLP_LATITUDES: usize = 37;

/// Longitude columns in a HadSLP2 block (177.5W..177.5E)
pub const HADSLP_LONGITUDES: usize = 72;

// =============================================================================
// Total Column Ozone Grids
// =============================================================================

/// Header lines preceding the grid body of an ozone anomaly dump
pub const OZONE_HEADER_LINES: usize = 4;

/// Ozone grid latitude spacing in degrees
pub const OZONE_LATITUDE_SPACING: f64 = 1.0;

/// Ozone grid longitude spacing in degrees
pub const OZONE_LONGITUDE_SPACING: f64 = 1.25;

/// Latitude bands in an ozone grid (89.5S..89.5N)
pub const OZONE_LATITUDES: usize = 180;

/// Longitude cells in an ozone grid (0.625E..359.375E)
pub const OZONE_LONGITUDES: usize = 288;

// =============================================================================
// Index Time Series Header Sizes
// =============================================================================

pub const POLAR_OZONE_HEADER_LINES: usize = 1;
pub const CARBON_MONOXIDE_HEADER_LINES: usize = 1;
pub const AO_HEADER_LINES: usize = 3;
pub const AAO_HEADER_LINES: usize = 5;
pub const SOI_HEADER_LINES: usize = 9;
pub const NAO_HEADER_LINES: usize = 9;
pub const SNAO_HEADER_LINES: usize = 0;
pub const WINTER_NAO_HEADER_LINES: usize = 1;

/// Monthly columns per annual row in the SOI plain-text table
pub const MONTHS_PER_YEAR: usize = 12;

// =============================================================================
// Climatology Defaults
// =============================================================================

/// First year of the default reference period (inclusive)
pub const DEFAULT_REFERENCE_START_YEAR: i32 = 1981;

/// Year after the default reference period ends (exclusive)
pub const DEFAULT_REFERENCE_END_YEAR: i32 = 2011;

/// A climatology cell needs strictly more contributing years than this
pub const DEFAULT_MIN_CLIMATOLOGY_YEARS: usize = 15;

/// An aggregate needs strictly more contributing sub-periods than this
pub const DEFAULT_MIN_AGGREGATE_OBSERVATIONS: usize = 6;
