//! Sentinel-based missing value masking
//!
//! Observation products encode missing entries as out-of-range numbers rather
//! than leaving gaps. These helpers turn such sentinels into masked entries
//! without changing the array's shape.

use crate::app::models::MaskedArray;
use ndarray::{Array, Dimension};

/// Rule deciding which raw values are sentinels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SentinelRule {
    /// Values at or below the threshold are missing (e.g. `-999.0`)
    AtOrBelow(f64),
    /// Values equal to the sentinel are missing
    EqualTo(f64),
}

impl SentinelRule {
    /// True for sentinel values and for NaN
    pub fn is_missing(&self, value: f64) -> bool {
        if value.is_nan() {
            return true;
        }
        match *self {
            SentinelRule::AtOrBelow(threshold) => value <= threshold,
            SentinelRule::EqualTo(sentinel) => value == sentinel,
        }
    }
}

/// Mask every entry of `data` for which `predicate` returns true
pub fn mask<D, F>(data: Array<f64, D>, predicate: F) -> MaskedArray<D>
where
    D: Dimension,
    F: Fn(f64) -> bool,
{
    MaskedArray::masked_where(data, predicate)
}

/// Mask every entry of `data` that the rule classifies as missing
pub fn apply<D: Dimension>(data: Array<f64, D>, rule: SentinelRule) -> MaskedArray<D> {
    mask(data, |value| rule.is_missing(value))
}

/// Apply an optional rule; without one only NaN entries are masked
pub fn apply_optional<D: Dimension>(
    data: Array<f64, D>,
    rule: Option<SentinelRule>,
) -> MaskedArray<D> {
    match rule {
        Some(rule) => apply(data, rule),
        None => mask(data, f64::is_nan),
    }
}
