//! Token-level helpers shared by the text parsers
//!
//! All parsers split lines on ASCII whitespace and report problems with the
//! 1-based line number of the offending line.

use crate::error::{ClimateError, Result};
use std::path::Path;
use tracing::debug;

/// Whitespace-separated tokens of a line
pub fn split_tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse a floating-point token
pub fn parse_float(source_name: &str, line: usize, token: &str) -> Result<f64> {
    token.parse::<f64>().map_err(|e| {
        ClimateError::format_at_line(
            source_name,
            line,
            format!("invalid number '{}' ({})", token, e),
        )
    })
}

/// Parse an integer token
pub fn parse_int(source_name: &str, line: usize, token: &str) -> Result<i32> {
    token.parse::<i32>().map_err(|e| {
        ClimateError::format_at_line(
            source_name,
            line,
            format!("invalid integer '{}' ({})", token, e),
        )
    })
}

/// Parse every token of a line as a float
pub fn parse_floats(source_name: &str, line: usize, tokens: &[&str]) -> Result<Vec<f64>> {
    tokens
        .iter()
        .map(|token| parse_float(source_name, line, token))
        .collect()
}

/// True when every token parses as an integer
pub fn all_integers(tokens: &[&str]) -> bool {
    tokens.iter().all(|token| token.parse::<i64>().is_ok())
}

/// Read a whole text file, attaching the path to any I/O error
pub fn read_source(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).map_err(|source| ClimateError::io(path, source))?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}
