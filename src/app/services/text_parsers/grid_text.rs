//! Fixed-header ASCII grid dumps
//!
//! The body is a row-major stream of floats wrapped over an arbitrary number
//! of lines per latitude band. Tokens are accumulated until exactly one band of
//! `n_lon` values is collected; a line that would straddle two bands is a
//! structural error.

use std::path::Path;
use tracing::{debug, info};

use super::stats::{ParseResult, ParseStats};
use super::tokens::{parse_floats, read_source, split_tokens};
use crate::app::models::{Grid2D, GridAxes};
use crate::app::services::missing_value::{SentinelRule, apply_optional};
use crate::error::{ClimateError, Result};
use ndarray::Array2;

/// Layout of a grid dump
#[derive(Debug, Clone, PartialEq)]
pub struct GridTextConfig {
    /// Name used in errors and log output
    pub label: String,

    /// Lines skipped before the grid body
    pub header_lines: usize,

    /// Missing value rule applied before returning
    pub sentinel: Option<SentinelRule>,
}

impl GridTextConfig {
    pub fn new(label: impl Into<String>, header_lines: usize) -> Self {
        Self {
            label: label.into(),
            header_lines,
            sentinel: None,
        }
    }

    pub fn with_sentinel(mut self, sentinel: SentinelRule) -> Self {
        self.sentinel = Some(sentinel);
        self
    }
}

/// Parser for single-snapshot grid dumps
#[derive(Debug, Clone)]
pub struct GridTextParser {
    config: GridTextConfig,
}

impl GridTextParser {
    pub fn new(config: GridTextConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridTextConfig {
        &self.config
    }

    /// Parse a grid dump onto the given axes
    pub fn parse(&self, raw: &str, axes: &GridAxes) -> Result<Grid2D> {
        self.parse_detailed(raw, axes).map(|result| result.output)
    }

    /// Read and parse a grid dump file
    pub fn parse_file(&self, path: &Path, axes: &GridAxes) -> Result<Grid2D> {
        info!("Parsing grid file: {}", path.display());
        let raw = read_source(path)?;
        self.parse(&raw, axes)
    }

    /// Parse a grid dump, also returning parse statistics
    pub fn parse_detailed(&self, raw: &str, axes: &GridAxes) -> Result<ParseResult<Grid2D>> {
        let label = self.config.label.as_str();
        let (n_lat, n_lon) = axes.shape();
        let mut stats = ParseStats {
            header_lines_skipped: self.config.header_lines,
            ..ParseStats::new()
        };

        let mut values: Vec<f64> = Vec::with_capacity(n_lat * n_lon);
        let mut band: Vec<f64> = Vec::with_capacity(n_lon);

        for (index, line) in raw.lines().enumerate().skip(self.config.header_lines) {
            let line_number = index + 1;
            let tokens = split_tokens(line);
            stats.lines_read += 1;
            if tokens.is_empty() {
                continue;
            }
            if stats.records == n_lat {
                return Err(ClimateError::format_at_line(
                    label,
                    line_number,
                    format!("data beyond the {} declared latitude bands", n_lat),
                ));
            }
            if band.len() + tokens.len() > n_lon {
                return Err(ClimateError::format_at_line(
                    label,
                    line_number,
                    format!(
                        "line of {} values crosses the boundary of latitude band {} ({} of {} values collected)",
                        tokens.len(),
                        stats.records,
                        band.len(),
                        n_lon
                    ),
                ));
            }

            band.extend(parse_floats(label, line_number, &tokens)?);
            if band.len() == n_lon {
                values.append(&mut band);
                stats.records += 1;
            }
        }

        if !band.is_empty() {
            return Err(ClimateError::format_at_end(
                label,
                format!(
                    "partial latitude band: {} of {} values",
                    band.len(),
                    n_lon
                ),
            ));
        }
        if stats.records < n_lat {
            return Err(ClimateError::format_at_end(
                label,
                format!(
                    "found {} latitude bands, expected {}",
                    stats.records, n_lat
                ),
            ));
        }

        let data = Array2::from_shape_vec((n_lat, n_lon), values)
            .map_err(|e| ClimateError::format_at_end(label, e.to_string()))?;
        let masked = apply_optional(data, self.config.sentinel);
        stats.values_parsed = masked.len();
        stats.values_masked = masked.count_masked();

        debug!(
            "{}: {} bands of {} values, {:.1}% present",
            label,
            stats.records,
            n_lon,
            stats.coverage()
        );

        Ok(ParseResult {
            output: Grid2D::new(axes.clone(), masked)?,
            stats,
        })
    }
}
