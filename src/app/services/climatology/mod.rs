//! Climatological baselines with data-sufficiency masking
//!
//! The engine restricts a series to its reference period, groups the
//! remaining steps by phase of the cadence's cycle and averages each group
//! while ignoring masked samples. Coverage that is present but too thin is
//! expressed as masked output; only an empty reference window is an error.
//!
//! ## Architecture
//!
//! - [`engine`] - the [`ClimatologyEngine`] computation
//! - [`field`] - the [`ClimatologyField`] result structure

pub mod engine;
pub mod field;

#[cfg(test)]
pub mod tests;

pub use engine::ClimatologyEngine;
pub use field::ClimatologyField;
