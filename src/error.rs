//! Error handling for climatology processing operations.
//!
//! Parse-time structural problems surface as [`ClimateError::Format`] and are
//! fatal for the file being read. A climatology or aggregation request with no
//! usable samples surfaces as [`ClimateError::InsufficientData`]. Partial
//! coverage is never an error: it is expressed through masked output cells.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClimateError {
    /// Reading a source file failed
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structural problem in parsed input
    #[error("Format error in {source_name} at {location}: {reason}")]
    Format {
        source_name: String,
        location: String,
        reason: String,
    },

    /// No usable samples for the requested computation
    #[error("Insufficient data: {context}")]
    InsufficientData { context: String },

    /// Tiled climatology phase disagrees with the target step
    #[error(
        "Climatology phase misaligned at target index {index}: expected phase {expected}, found {found}"
    )]
    PhaseMisaligned {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Shapes or coordinate axes do not line up
    #[error("Axis mismatch: {reason}")]
    AxisMismatch { reason: String },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Year, month and day do not form a calendar date
    #[error("Invalid calendar date: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// TOML configuration could not be deserialized
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl ClimateError {
    /// Create an I/O error tied to the file being read
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a format error at a 1-based line number
    pub fn format_at_line(
        source_name: impl Into<String>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::Format {
            source_name: source_name.into(),
            location: format!("line {}", line),
            reason: reason.into(),
        }
    }

    /// Create a format error detected once all input has been consumed
    pub fn format_at_end(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            source_name: source_name.into(),
            location: "end of input".to_string(),
            reason: reason.into(),
        }
    }

    /// Create an insufficient data error
    pub fn insufficient_data(context: impl Into<String>) -> Self {
        Self::InsufficientData {
            context: context.into(),
        }
    }

    /// Create an axis mismatch error
    pub fn axis_mismatch(reason: impl Into<String>) -> Self {
        Self::AxisMismatch {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for structural parse failures
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// True when a computation had no usable samples at all
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClimateError>;
