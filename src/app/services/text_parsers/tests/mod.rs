//! Test utilities for the text parsers
//!
//! Builders for small synthetic inputs in each supported layout, shared by the
//! per-parser test modules.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::app::models::GridAxes;


/// Three latitude bands (-10, 0, 10) by four longitudes
pub fn small_axes() -> GridAxes {
    GridAxes::regular(-10.0, 10.0, 3, 0.0, 90.0, 4).unwrap()
}

/// A grid dump for [`small_axes`] with each band wrapped over two lines
pub fn create_grid_dump(header_lines: usize) -> String {
    let mut text = String::new();
    for h in 0..header_lines {
        text.push_str(&format!("header line {}\n", h));
    }
    for band in 0..3 {
        let base = band as f64 * 10.0;
        text.push_str(&format!("{:.1} {:.1} {:.1}\n", base, base + 1.0, base + 2.0));
        text.push_str(&format!("{:.1}\n", base + 3.0));
    }
    text
}

/// A monthly block archive for [`small_axes`], rows north to south
///
/// Each block holds `month * 100 + row * 10 + column` in centi-units.
pub fn create_block_archive(headers: &[(i32, i32)]) -> String {
    let mut text = String::new();
    for &(first, second) in headers {
        text.push_str(&format!("{} {}\n", first, second));
        for row in 0..3 {
            let values: Vec<String> = (0..4)
                .map(|column| (second * 100 + row * 10 + column).to_string())
                .collect();
            text.push_str(&values.join(" "));
            text.push('\n');
        }
    }
    text
}

/// An SOI-style table: one row per year with twelve monthly columns
pub fn create_monthly_column_table(header_lines: usize, years: &[i32]) -> String {
    let mut text = String::new();
    for h in 0..header_lines {
        text.push_str(&format!("SOI header {}\n", h));
    }
    for &year in years {
        let values: Vec<String> = (1..=12).map(|m| format!("{:.1}", m as f64)).collect();
        text.push_str(&format!("{} {}\n", year, values.join(" ")));
    }
    text
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
