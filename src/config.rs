//! Configuration management and validation.
//!
//! Provides the explicit configuration passed into the climatology engine and
//! anomaly compositor: the reference period and the minimum-sufficiency
//! thresholds. Nothing is read from ambient state.

use crate::app::models::ReferencePeriod;
use crate::constants::{DEFAULT_MIN_AGGREGATE_OBSERVATIONS, DEFAULT_MIN_CLIMATOLOGY_YEARS};
use crate::error::{ClimateError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Global configuration for a climatology/anomaly batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Half-open reference window the climatology is computed over
    pub reference: ReferencePeriod,

    /// Climatology cells with this many contributing years or fewer are masked
    pub min_climatology_years: usize,

    /// Aggregates with this many contributing sub-periods or fewer are masked
    pub min_aggregate_observations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference: ReferencePeriod::default(),
            min_climatology_years: DEFAULT_MIN_CLIMATOLOGY_YEARS,
            min_aggregate_observations: DEFAULT_MIN_AGGREGATE_OBSERVATIONS,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from a TOML document, then validate it
    ///
    /// ```toml
    /// min_climatology_years = 15
    /// min_aggregate_observations = 6
    ///
    /// [reference]
    /// start = "1981-01-01"
    /// end = "2011-01-01"
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(document)?;
        config.validate()?;
        debug!(
            "Loaded analysis config: reference {}, min years {}, min observations {}",
            config.reference, config.min_climatology_years, config.min_aggregate_observations
        );
        Ok(config)
    }

    /// Reject reference periods that select nothing
    pub fn validate(&self) -> Result<()> {
        if self.reference.start >= self.reference.end {
            return Err(ClimateError::configuration(format!(
                "reference period {} is empty or inverted",
                self.reference
            )));
        }
        Ok(())
    }

    /// Create configuration with a custom reference period
    pub fn with_reference(mut self, reference: ReferencePeriod) -> Self {
        self.reference = reference;
        self
    }

    /// Create configuration with a custom climatology sufficiency threshold
    pub fn with_min_climatology_years(mut self, min_years: usize) -> Self {
        self.min_climatology_years = min_years;
        self
    }

    /// Create configuration with a custom aggregate sufficiency threshold
    pub fn with_min_aggregate_observations(mut self, min_observations: usize) -> Self {
        self.min_aggregate_observations = min_observations;
        self
    }
}
