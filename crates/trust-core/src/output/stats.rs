//! Run Reports
//!
//! A serialisable summary of one run: its configuration, the recorded
//! series with summary statistics, and the final trust propensities.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use trust_metrics::{MetricsSeries, SeriesSummary};

use crate::config::ModelConfig;
use crate::model::Model;

/// Everything reporting tools need from a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub config: ModelConfig,
    pub steps: u64,
    pub summary: SeriesSummary,
    pub series: MetricsSeries,
    /// Final trust propensity of every agent, by id
    pub trust_propensities: Vec<f64>,
}

impl RunReport {
    pub fn from_model(model: &Model) -> Self {
        Self {
            config: model.config().clone(),
            steps: model.steps(),
            summary: model.series().summary(),
            series: model.series().clone(),
            trust_propensities: model.trust_propensities(),
        }
    }
}

/// Writes `report` as pretty JSON, creating parent directories as needed.
pub fn write_report(path: &Path, report: &RunReport) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    fs::write(path, json)
}
