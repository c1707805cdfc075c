//! Climatology Processor Library
//!
//! A Rust library for turning legacy climate observation text files into
//! masked grids and time series, and deriving climatological baselines,
//! anomalies and seasonal/annual composites from them.
//!
//! This library provides tools for:
//! - Parsing fixed-header grid dumps, monthly block archives and index tables
//! - Masking sentinel-encoded missing values without changing array shapes
//! - Computing per-month climatologies with minimum-coverage masking
//! - Tiling climatologies across long targets with phase checking
//! - Averaging anomalies over annual and multi-month windows

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod anomaly;
        pub mod climatology;
        pub mod missing_value;
        pub mod sources;
        pub mod text_parsers;
    }
}

// Re-export commonly used types
pub use app::models::{
    AggregationWindow, Cadence, Grid2D, GridAxes, GridSeries, MaskedArray, PeriodicData,
    ReferencePeriod, TimeSeries,
};
pub use app::services::anomaly::{Anomalies, AnomalyCompositor, AnomalyField, Composite};
pub use app::services::climatology::{ClimatologyEngine, ClimatologyField};
pub use config::AnalysisConfig;
pub use error::{ClimateError, Result};
