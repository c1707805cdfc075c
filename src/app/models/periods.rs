//! Half-open calendar windows used to restrict series
//!
//! [`ReferencePeriod`] selects the years a climatology is built from and
//! [`AggregationWindow`] selects the sub-periods averaged into a seasonal or
//! annual composite. Both include `start` and exclude `end`.

use super::calendar::{add_months, month_start};
use crate::constants::{DEFAULT_REFERENCE_END_YEAR, DEFAULT_REFERENCE_START_YEAR};
use crate::error::{ClimateError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference period `[start, end)` for a climatology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReferencePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(ClimateError::configuration(format!(
                "reference period {}..{} is empty or inverted",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar years: 1 January of `first_year` up to 1 January of `end_year`
    pub fn years(first_year: i32, end_year: i32) -> Result<Self> {
        Self::new(month_start(first_year, 1)?, month_start(end_year, 1)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl Default for ReferencePeriod {
    /// 1981-2010
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(DEFAULT_REFERENCE_START_YEAR, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(DEFAULT_REFERENCE_END_YEAR, 1, 1).unwrap_or_default(),
        }
    }
}

impl fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Labelled window `[start, end)` averaged into one composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationWindow {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AggregationWindow {
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(ClimateError::configuration(format!(
                "aggregation window {}..{} is empty or inverted",
                start, end
            )));
        }
        Ok(Self {
            label: label.into(),
            start,
            end,
        })
    }

    /// January to December of `year`
    pub fn annual(year: i32) -> Result<Self> {
        Self::new(
            year.to_string(),
            month_start(year, 1)?,
            month_start(year + 1, 1)?,
        )
    }

    /// `count` consecutive months starting at `first_month` of `year`
    ///
    /// Windows may cross the year boundary: `months(2015, 12, 3)` covers
    /// December 2015 to February 2016.
    pub fn months(year: i32, first_month: u32, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(ClimateError::configuration("a window needs at least one month"));
        }
        let start = month_start(year, first_month)?;
        let end = add_months(start, count)?;
        Ok(Self {
            label: format!("{} +{}m", start.format("%Y-%m"), count),
            start,
            end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl fmt::Display for AggregationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}..{})", self.label, self.start, self.end)
    }
}
