//! Configuration loading for parameter sweeps.
//!
//! A sweep is a base model configuration plus the neighbourhood-size and
//! mobility-rate ranges to cross, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use trust_core::ModelConfig;

use crate::grid::grid;
use crate::SweepError;

/// Inclusive range of neighbourhood sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
    pub step: usize,
}

impl SizeRange {
    pub fn values(&self) -> Vec<usize> {
        if self.step == 0 || self.min > self.max {
            return Vec::new();
        }
        (self.min..=self.max).step_by(self.step).collect()
    }
}

/// Inclusive range of rates, tolerant to floating point drift at the upper
/// end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl RateRange {
    /// Number of grid values, `floor((max - min + 1e-4) / step) + 1`.
    pub fn count(&self) -> usize {
        if self.step.is_nan() || self.step <= 0.0 || self.min > self.max {
            return 0;
        }
        ((self.max - self.min + 1e-4) / self.step).floor() as usize + 1
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.count())
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }
}

/// Complete sweep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Unrecorded warm-up ticks per grid point
    pub onset: u64,
    /// Recorded ticks per grid point
    pub recorded: u64,
    pub neighbourhood_sizes: SizeRange,
    pub mobility_rates: RateRange,
    /// Base configuration; neighbourhood size and mobility rate are
    /// overridden per grid point, and grid point `i` runs with seed
    /// `model.seed + i`
    pub model: ModelConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            onset: 100,
            recorded: 1000,
            neighbourhood_sizes: SizeRange {
                min: 10,
                max: 100,
                step: 10,
            },
            mobility_rates: RateRange {
                min: 0.0,
                max: 0.3,
                step: 0.03,
            },
            model: ModelConfig {
                num_agents: 1000,
                ..Default::default()
            },
        }
    }
}

impl SweepConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SweepError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, SweepError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialises the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Rejects empty ranges and any grid point whose model configuration
    /// would not run, so nothing is written for a sweep that cannot finish.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.neighbourhood_sizes.values().is_empty() {
            return Err(SweepError::EmptyRange("neighbourhood_sizes"));
        }
        if self.mobility_rates.count() == 0 {
            return Err(SweepError::EmptyRange("mobility_rates"));
        }
        for point in grid(self) {
            point.model_config(&self.model).validate()?;
        }
        Ok(())
    }
}
