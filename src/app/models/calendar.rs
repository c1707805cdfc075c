//! Calendar arithmetic shared by the parsers and the climatology engine
//!
//! Offsets are whole days between calendar dates, so month lengths and leap
//! years are honoured exactly.

use crate::constants::MONTHS_PER_YEAR;
use crate::error::{ClimateError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling cadence of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    Daily,
    Monthly,
    Annual,
}

impl Cadence {
    /// Number of sub-periods in one climatological cycle
    ///
    /// Daily series have no cycle: the reference climatologies are monthly or annual.
    pub fn cycle_length(&self) -> Option<usize> {
        match self {
            Cadence::Daily => None,
            Cadence::Monthly => Some(MONTHS_PER_YEAR),
            Cadence::Annual => Some(1),
        }
    }

    /// Position of `date` within the cycle (calendar month for monthly data)
    pub fn phase_of(&self, date: NaiveDate) -> usize {
        match self {
            Cadence::Monthly => date.month0() as usize,
            Cadence::Annual | Cadence::Daily => 0,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cadence::Daily => "daily",
            Cadence::Monthly => "monthly",
            Cadence::Annual => "annual",
        };
        write!(f, "{}", name)
    }
}

/// First day of a month, rejecting impossible months
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ClimateError::InvalidDate {
        year,
        month,
        day: 1,
    })
}

/// A calendar date, rejecting impossible days
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ClimateError::InvalidDate { year, month, day })
}

/// First day of the month `months` after `date`'s month
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(ClimateError::InvalidDate {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        })
}

/// Whole days from `epoch` to `date`
pub fn days_since(epoch: NaiveDate, date: NaiveDate) -> i64 {
    (date - epoch).num_days()
}

fn days_in_year(year: i32) -> f64 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366.0
    } else {
        365.0
    }
}

/// Fractional-year coordinate of a date at the given cadence
///
/// Monthly dates map to `year + (month - 1) / 12`, annual dates to the year,
/// daily dates to `year + day_of_year / days_in_year`.
pub fn decimal_year(date: NaiveDate, cadence: Cadence) -> f64 {
    let year = date.year() as f64;
    match cadence {
        Cadence::Annual => year,
        Cadence::Monthly => year + date.month0() as f64 / MONTHS_PER_YEAR as f64,
        Cadence::Daily => year + date.ordinal0() as f64 / days_in_year(date.year()),
    }
}

/// Calendar date of a fractional-year coordinate at the given cadence
///
/// Monthly coordinates are rounded to the nearest month so values such as
/// `1951.0833333` land on February.
pub fn date_from_decimal_year(time: f64, cadence: Cadence) -> Result<NaiveDate> {
    const EPSILON: f64 = 1e-6;
    if !time.is_finite() {
        return Err(ClimateError::configuration(format!(
            "non-finite time coordinate {}",
            time
        )));
    }
    let year = (time + EPSILON).floor();
    let fraction = (time - year).max(0.0);
    let year = year as i32;

    match cadence {
        Cadence::Annual => month_start(year, 1),
        Cadence::Monthly => {
            let month0 = (fraction * MONTHS_PER_YEAR as f64).round() as u32;
            add_months(month_start(year, 1)?, month0)
        }
        Cadence::Daily => {
            let start = month_start(year, 1)?;
            let offset = (fraction * days_in_year(year)).round() as u64;
            start
                .checked_add_days(chrono::Days::new(offset))
                .ok_or(ClimateError::InvalidDate {
                    year,
                    month: 1,
                    day: 1,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_since_crosses_year_boundary() {
        assert_eq!(days_since(date(2015, 12, 1), date(2016, 1, 1)), 31);
        assert_eq!(days_since(date(2016, 2, 1), date(2016, 3, 1)), 29);
        assert_eq!(days_since(date(2015, 2, 1), date(2015, 3, 1)), 28);
    }

    #[test]
    fn test_month_start_rejects_month_thirteen() {
        assert!(matches!(
            month_start(2016, 13),
            Err(ClimateError::InvalidDate { month: 13, .. })
        ));
    }

    #[test]
    fn test_decimal_year_round_trip_monthly() {
        for month in 1..=12 {
            let d = date(1951, month, 1);
            let t = decimal_year(d, Cadence::Monthly);
            assert_eq!(date_from_decimal_year(t, Cadence::Monthly).unwrap(), d);
        }
    }

    #[test]
    fn test_date_from_decimal_year_annual() {
        assert_eq!(
            date_from_decimal_year(1979.0, Cadence::Annual).unwrap(),
            date(1979, 1, 1)
        );
    }

    #[test]
    fn test_cadence_phase() {
        assert_eq!(Cadence::Monthly.phase_of(date(2016, 12, 1)), 11);
        assert_eq!(Cadence::Annual.phase_of(date(2016, 12, 1)), 0);
        assert_eq!(Cadence::Monthly.cycle_length(), Some(12));
        assert_eq!(Cadence::Daily.cycle_length(), None);
    }
}
