//! Parsers for legacy climate observation text formats
//!
//! Each parser turns one loosely structured ASCII layout into the normalized
//! model types. Structural problems are fatal for the input being read and
//! surface as [`ClimateError::Format`](crate::ClimateError::Format) carrying the
//! source label and line number; missing values are masked, never dropped.
//!
//! ## Architecture
//!
//! - [`grid_text`] - single-snapshot grid dumps into a `Grid2D`
//! - [`monthly_block`] - header/body monthly block archives into a `GridSeries`
//! - [`series_text`] - multi-column index tables into a `TimeSeries`
//! - [`tokens`] - tokenization and numeric field helpers
//! - [`stats`] - parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use climatology_processor::app::services::text_parsers::{
//!     SeriesLayout, SeriesTextParser, TimeLayout,
//! };
//!
//! # fn example() -> climatology_processor::Result<()> {
//! let layout = SeriesLayout::new("AO", TimeLayout::YearMonth, 0);
//! let series = SeriesTextParser::new(layout).parse("1950 1 -0.06\n1950 2 0.63\n")?;
//! assert_eq!(series.len(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod grid_text;
pub mod monthly_block;
pub mod series_text;
pub mod stats;
pub mod tokens;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use grid_text::{GridTextConfig, GridTextParser};
pub use monthly_block::{
    BlockState, HeaderOrder, LineKind, MonthlyBlockConfig, MonthlyBlockParser, RowAxis,
};
pub use series_text::{SeriesLayout, SeriesTextParser, TimeLayout};
pub use stats::{ParseResult, ParseStats};
