//! Recorded Series
//!
//! The ordered list of snapshots produced by a run, plus the summary
//! statistics downstream reporting needs (mean per metric and a
//! `describe`-style table).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Metric, MetricsSnapshot};

/// Snapshots recorded over the recorded phase of a run, in step order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSeries {
    pub snapshots: Vec<MetricsSnapshot>,
}

impl MetricsSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: MetricsSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Values of one metric across all recorded steps.
    pub fn values(&self, metric: Metric) -> impl Iterator<Item = f64> + '_ {
        self.snapshots.iter().map(move |s| s.get(metric))
    }

    /// Mean of one metric, or `0.0` for an empty series.
    pub fn mean(&self, metric: Metric) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.values(metric).sum::<f64>() / self.len() as f64
    }

    /// Summary statistics for every metric.
    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            metrics: Metric::ALL
                .into_iter()
                .map(|metric| MetricSummary::from_values(metric, self.values(metric)))
                .collect(),
        }
    }

    /// Serializes the series as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a series from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Count, mean, sample standard deviation and range of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    fn from_values(metric: Metric, values: impl Iterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.collect();
        let count = values.len();
        if count == 0 {
            return Self {
                metric,
                count,
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        // Sample standard deviation (n - 1), zero for a single value
        let std = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            metric,
            count,
            mean,
            std,
            min,
            max,
        }
    }
}

/// Summary of every metric of a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub metrics: Vec<MetricSummary>,
}

impl SeriesSummary {
    pub fn get(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24} {:>7} {:>9} {:>9} {:>9} {:>9}",
            "metric", "count", "mean", "std", "min", "max"
        )?;
        for m in &self.metrics {
            writeln!(
                f,
                "{:<24} {:>7} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
                m.metric.name(),
                m.count,
                m.mean,
                m.std,
                m.min,
                m.max
            )?;
        }
        Ok(())
    }
}
