//! Parsing statistics and result structures for the text parsers
//!
//! Every parser can report what it consumed alongside its output, which is
//! logged at the end of a parse and exposed to callers through `parse_detailed`.

use serde::{Deserialize, Serialize};

/// Parser output together with its statistics
#[derive(Debug, Clone)]
pub struct ParseResult<T> {
    /// Normalized structure built from the text
    pub output: T,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines examined after header skipping, excluding trimmed footer lines
    pub lines_read: usize,

    /// Header lines skipped at the top of the input
    pub header_lines_skipped: usize,

    /// Footer lines skipped at the bottom of the input
    pub footer_lines_skipped: usize,

    /// Numeric values collected
    pub values_parsed: usize,

    /// Values masked as missing
    pub values_masked: usize,

    /// Latitude bands, monthly blocks or series rows committed
    pub records: usize,

    /// Whether the incomplete-final-row recovery was applied
    pub footer_recovered: bool,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of parsed values that are present, as a percentage
    pub fn coverage(&self) -> f64 {
        if self.values_parsed == 0 {
            0.0
        } else {
            ((self.values_parsed - self.values_masked) as f64 / self.values_parsed as f64) * 100.0
        }
    }
}

