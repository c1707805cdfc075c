//! Multi-column ASCII time series
//!
//! The leading token(s) of each row give the time coordinate and the remaining
//! tokens are data columns. Every retained row must carry the same number of
//! tokens. A table whose last row is an unfinished year can be read with the
//! footer recovery enabled: when the only defect is a short final row, that row
//! is dropped and parsing is repeated.

use std::path::Path;
use tracing::{debug, info, warn};

use super::stats::{ParseResult, ParseStats};
use super::tokens::{parse_float, parse_floats, parse_int, read_source, split_tokens};
use crate::app::models::calendar::calendar_date;
use crate::app::models::{Cadence, SeriesTimes, TimeSeries};
use crate::app::services::missing_value::{SentinelRule, apply_optional};
use crate::constants::{MONTHS_PER_YEAR, SERIES_MISSING_THRESHOLD};
use crate::error::{ClimateError, Result};
use chrono::NaiveDate;
use ndarray::Array1;

/// How the time coordinate is laid out on each row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLayout {
    /// `year v1 v2 ...`, one annual value per row
    Year,
    /// `year month v1 ...`, one monthly value per row
    YearMonth,
    /// `year p1 p2 ... pN`, one row per year with `periods` sub-period columns
    YearWithPeriodColumns { periods: usize },
    /// `month day v1 ...` within a December-to-March season; months before
    /// December fall in `season_start_year + 1`
    MonthDay { season_start_year: i32 },
}

impl TimeLayout {
    /// Tokens taken by the time coordinate
    pub fn time_columns(&self) -> usize {
        match self {
            TimeLayout::Year | TimeLayout::YearWithPeriodColumns { .. } => 1,
            TimeLayout::YearMonth | TimeLayout::MonthDay { .. } => 2,
        }
    }

    pub fn cadence(&self) -> Result<Cadence> {
        match self {
            TimeLayout::Year => Ok(Cadence::Annual),
            TimeLayout::YearMonth => Ok(Cadence::Monthly),
            TimeLayout::YearWithPeriodColumns { periods: 1 } => Ok(Cadence::Annual),
            TimeLayout::YearWithPeriodColumns { periods } if *periods == MONTHS_PER_YEAR => {
                Ok(Cadence::Monthly)
            }
            TimeLayout::YearWithPeriodColumns { periods } => Err(ClimateError::configuration(
                format!("{} sub-period columns per year is not a supported cadence", periods),
            )),
            TimeLayout::MonthDay { .. } => Ok(Cadence::Daily),
        }
    }
}

/// Row layout of a time series table
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLayout {
    /// Series name, also used in errors and log output
    pub label: String,

    pub time: TimeLayout,

    /// Data column (0-based, after the time columns) read for single-value layouts
    pub value_column: usize,

    /// Lines skipped at the top of the input
    pub skip_header: usize,

    /// Non-blank lines skipped at the bottom of the input
    pub skip_footer: usize,

    /// Tokens per row; taken from the first retained row when unset
    pub expected_tokens: Option<usize>,

    pub sentinel: Option<SentinelRule>,

    /// Retry with one more footer line when only the final row is short
    pub footer_recovery: bool,
}

impl SeriesLayout {
    pub fn new(label: impl Into<String>, time: TimeLayout, skip_header: usize) -> Self {
        let expected_tokens = match time {
            TimeLayout::YearWithPeriodColumns { periods } => Some(1 + periods),
            _ => None,
        };
        Self {
            label: label.into(),
            time,
            value_column: 0,
            skip_header,
            skip_footer: 0,
            expected_tokens,
            sentinel: Some(SentinelRule::AtOrBelow(SERIES_MISSING_THRESHOLD)),
            footer_recovery: false,
        }
    }

    pub fn with_value_column(mut self, column: usize) -> Self {
        self.value_column = column;
        self
    }

    pub fn with_skip_footer(mut self, lines: usize) -> Self {
        self.skip_footer = lines;
        self
    }

    pub fn with_expected_tokens(mut self, tokens: usize) -> Self {
        self.expected_tokens = Some(tokens);
        self
    }

    pub fn with_sentinel(mut self, sentinel: Option<SentinelRule>) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn with_footer_recovery(mut self, enabled: bool) -> Self {
        self.footer_recovery = enabled;
        self
    }
}

/// Why a strict parse attempt failed
#[derive(Debug)]
enum StrictFailure {
    /// The final retained row is shorter than every other row
    IncompleteFinalRow {
        line: usize,
        found: usize,
        expected: usize,
    },
    Fatal(ClimateError),
}

impl From<ClimateError> for StrictFailure {
    fn from(error: ClimateError) -> Self {
        StrictFailure::Fatal(error)
    }
}

impl StrictFailure {
    fn into_error(self, label: &str) -> ClimateError {
        match self {
            StrictFailure::IncompleteFinalRow {
                line,
                found,
                expected,
            } => ClimateError::format_at_line(
                label,
                line,
                format!("final row has {} tokens, expected {}", found, expected),
            ),
            StrictFailure::Fatal(error) => error,
        }
    }
}

/// Time coordinates accumulated while reading rows
enum TimeAccumulator {
    Years(Vec<f64>),
    Dates(Vec<NaiveDate>),
}

impl TimeAccumulator {
    fn last_years(&self) -> Option<f64> {
        match self {
            TimeAccumulator::Years(times) => times.last().copied(),
            TimeAccumulator::Dates(_) => None,
        }
    }
}

/// Parser for multi-column time series tables
#[derive(Debug, Clone)]
pub struct SeriesTextParser {
    layout: SeriesLayout,
}

impl SeriesTextParser {
    pub fn new(layout: SeriesLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SeriesLayout {
        &self.layout
    }

    /// Parse a table into a time series
    pub fn parse(&self, raw: &str) -> Result<TimeSeries> {
        self.parse_detailed(raw).map(|result| result.output)
    }

    /// Read and parse a table file
    pub fn parse_file(&self, path: &Path) -> Result<TimeSeries> {
        info!("Parsing time series file: {}", path.display());
        let raw = read_source(path)?;
        let series = self.parse(&raw)?;
        info!("Parsed {} entries for {}", series.len(), series.name());
        Ok(series)
    }

    /// Parse a table, also returning parse statistics
    pub fn parse_detailed(&self, raw: &str) -> Result<ParseResult<TimeSeries>> {
        let label = self.layout.label.as_str();
        match self.parse_strict(raw, self.layout.skip_footer) {
            Ok(result) => Ok(result),
            Err(StrictFailure::IncompleteFinalRow {
                line,
                found,
                expected,
            }) if self.layout.footer_recovery => {
                warn!(
                    "{}: final row at line {} has {} of {} tokens, retrying without it",
                    label, line, found, expected
                );
                let mut result = self
                    .parse_strict(raw, self.layout.skip_footer + 1)
                    .map_err(|failure| failure.into_error(label))?;
                result.stats.footer_recovered = true;
                Ok(result)
            }
            Err(failure) => Err(failure.into_error(label)),
        }
    }

    fn parse_strict(
        &self,
        raw: &str,
        skip_footer: usize,
    ) -> std::result::Result<ParseResult<TimeSeries>, StrictFailure> {
        let layout = &self.layout;
        let label = layout.label.as_str();
        let cadence = layout.time.cadence()?;

        let mut rows: Vec<(usize, Vec<&str>)> = raw
            .lines()
            .enumerate()
            .skip(layout.skip_header)
            .map(|(index, line)| (index + 1, split_tokens(line)))
            .filter(|(_, tokens)| !tokens.is_empty())
            .collect();
        let kept = rows.len().saturating_sub(skip_footer);
        let footer_lines_skipped = rows.len() - kept;
        rows.truncate(kept);

        let Some(first) = rows.first() else {
            return Err(ClimateError::insufficient_data(format!(
                "{}: no data rows after skipping {} header and {} footer lines",
                label, layout.skip_header, footer_lines_skipped
            ))
            .into());
        };
        let expected = layout.expected_tokens.unwrap_or(first.1.len());
        let time_columns = layout.time.time_columns();
        if expected <= time_columns + layout.value_column
            && !matches!(layout.time, TimeLayout::YearWithPeriodColumns { .. })
        {
            return Err(ClimateError::format_at_line(
                label,
                first.0,
                format!(
                    "rows of {} tokens have no data column {}",
                    expected, layout.value_column
                ),
            )
            .into());
        }

        let mut times = match layout.time {
            TimeLayout::MonthDay { .. } => TimeAccumulator::Dates(Vec::with_capacity(rows.len())),
            _ => TimeAccumulator::Years(Vec::with_capacity(rows.len())),
        };
        let mut values: Vec<f64> = Vec::with_capacity(rows.len());
        let last_row = rows.len() - 1;

        for (row_index, (line, tokens)) in rows.iter().enumerate() {
            let line = *line;
            if tokens.len() != expected {
                if row_index == last_row && tokens.len() < expected {
                    return Err(StrictFailure::IncompleteFinalRow {
                        line,
                        found: tokens.len(),
                        expected,
                    });
                }
                return Err(ClimateError::format_at_line(
                    label,
                    line,
                    format!("row has {} tokens, expected {}", tokens.len(), expected),
                )
                .into());
            }
            self.read_row(line, tokens, &mut times, &mut values)?;
        }

        let series_times = match times {
            TimeAccumulator::Years(years) => SeriesTimes::DecimalYears(years),
            TimeAccumulator::Dates(dates) => SeriesTimes::Dates(dates),
        };
        let masked = apply_optional(Array1::from(values), layout.sentinel);
        let stats = ParseStats {
            lines_read: rows.len(),
            header_lines_skipped: layout.skip_header,
            footer_lines_skipped,
            values_parsed: masked.len(),
            values_masked: masked.count_masked(),
            records: rows.len(),
            footer_recovered: false,
        };
        debug!(
            "{}: {} rows, {} values, {:.1}% present",
            label,
            stats.records,
            stats.values_parsed,
            stats.coverage()
        );

        Ok(ParseResult {
            output: TimeSeries::new(label, cadence, series_times, masked)?,
            stats,
        })
    }

    /// Decode one row into time coordinates and values
    fn read_row(
        &self,
        line: usize,
        tokens: &[&str],
        times: &mut TimeAccumulator,
        values: &mut Vec<f64>,
    ) -> Result<()> {
        let layout = &self.layout;
        let label = layout.label.as_str();
        let data_column = layout.time.time_columns() + layout.value_column;
        let previous = times.last_years();

        let row_times: Vec<f64> = match layout.time {
            TimeLayout::Year => {
                values.push(parse_float(label, line, tokens[data_column])?);
                vec![parse_float(label, line, tokens[0])?]
            }
            TimeLayout::YearMonth => {
                let year = parse_int(label, line, tokens[0])?;
                let month = self.month(line, tokens[1])?;
                values.push(parse_float(label, line, tokens[data_column])?);
                vec![year as f64 + (month - 1) as f64 / MONTHS_PER_YEAR as f64]
            }
            TimeLayout::YearWithPeriodColumns { periods } => {
                let year = parse_int(label, line, tokens[0])?;
                values.extend(parse_floats(label, line, &tokens[1..])?);
                (0..periods)
                    .map(|k| year as f64 + k as f64 / periods as f64)
                    .collect()
            }
            TimeLayout::MonthDay { season_start_year } => {
                let month = self.month(line, tokens[0])?;
                let day = parse_int(label, line, tokens[1])?;
                let year = if month < 12 {
                    season_start_year + 1
                } else {
                    season_start_year
                };
                if day < 1 {
                    return Err(ClimateError::format_at_line(
                        label,
                        line,
                        format!("day {} outside the month", day),
                    ));
                }
                let date = calendar_date(year, month, day as u32).map_err(|_| {
                    ClimateError::format_at_line(
                        label,
                        line,
                        format!("{}-{:02}-{:02} is not a calendar date", year, month, day),
                    )
                })?;
                if let TimeAccumulator::Dates(dates) = times {
                    if dates.last().is_some_and(|&last| date <= last) {
                        return Err(ClimateError::format_at_line(
                            label,
                            line,
                            format!("date {} does not follow the previous row", date),
                        ));
                    }
                    dates.push(date);
                }
                values.push(parse_float(label, line, tokens[data_column])?);
                return Ok(());
            }
        };

        if let (Some(last), Some(&first)) = (previous, row_times.first()) {
            if first <= last {
                return Err(ClimateError::format_at_line(
                    label,
                    line,
                    format!("time {} does not follow {}", first, last),
                ));
            }
        }
        if let TimeAccumulator::Years(years) = times {
            years.extend(row_times);
        }
        Ok(())
    }

    fn month(&self, line: usize, token: &str) -> Result<u32> {
        let month = parse_int(&self.layout.label, line, token)?;
        if !(1..=12).contains(&month) {
            return Err(ClimateError::format_at_line(
                &self.layout.label,
                line,
                format!("month {} outside 1..=12", month),
            ));
        }
        Ok(month as u32)
    }
}
