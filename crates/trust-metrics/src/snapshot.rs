//! Snapshot Types
//!
//! One `MetricsSnapshot` captures the scalar metrics of a single recorded step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A scalar metric recorded every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Share of the population in the market
    MarketShare,
    /// Share of paired agents that chose to play
    PlayRate,
    /// Share of paired agents that chose to cooperate
    CooperationRate,
    /// Play rate among agents paired with a stranger
    TrustInStrangers,
    /// Play rate among agents paired inside their neighbourhood
    TrustInNeighbours,
    /// Play rate among agents paired with a newcomer inside a neighbourhood
    TrustInNewcomers,
    /// Mean trust (signal-reading) propensity over all agents
    MeanTrustPropensity,
}

impl Metric {
    /// All metrics in reporting order.
    pub const ALL: [Metric; 7] = [
        Metric::MarketShare,
        Metric::PlayRate,
        Metric::CooperationRate,
        Metric::TrustInStrangers,
        Metric::TrustInNeighbours,
        Metric::TrustInNewcomers,
        Metric::MeanTrustPropensity,
    ];

    /// Column name used in tables and exported files.
    pub fn name(self) -> &'static str {
        match self {
            Metric::MarketShare => "market_share",
            Metric::PlayRate => "play_rate",
            Metric::CooperationRate => "cooperation_rate",
            Metric::TrustInStrangers => "trust_in_strangers",
            Metric::TrustInNeighbours => "trust_in_neighbours",
            Metric::TrustInNewcomers => "trust_in_newcomers",
            Metric::MeanTrustPropensity => "mean_trust_propensity",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a metric name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMetricError(pub String);

impl fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric: {}", self.0)
    }
}

impl std::error::Error for ParseMetricError {}

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMetricError(s.to_string()))
    }
}

/// Metrics of one recorded step.
///
/// Rates whose denominator is empty are reported as `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Scheduler step at which the snapshot was taken
    pub step: u64,
    pub market_share: f64,
    pub play_rate: f64,
    pub cooperation_rate: f64,
    pub trust_in_strangers: f64,
    pub trust_in_neighbours: f64,
    pub trust_in_newcomers: f64,
    pub mean_trust_propensity: f64,
}

impl MetricsSnapshot {
    /// Returns the value of a single metric.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::MarketShare => self.market_share,
            Metric::PlayRate => self.play_rate,
            Metric::CooperationRate => self.cooperation_rate,
            Metric::TrustInStrangers => self.trust_in_strangers,
            Metric::TrustInNeighbours => self.trust_in_neighbours,
            Metric::TrustInNewcomers => self.trust_in_newcomers,
            Metric::MeanTrustPropensity => self.mean_trust_propensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>(), Ok(metric));
        }
        assert_eq!("Market_Share".parse::<Metric>(), Ok(Metric::MarketShare));
        assert!("gossip_rate".parse::<Metric>().is_err());
    }

    #[test]
    fn test_snapshot_get() {
        let snapshot = MetricsSnapshot {
            step: 3,
            market_share: 0.25,
            trust_in_newcomers: 0.5,
            ..Default::default()
        };
        assert_eq!(snapshot.get(Metric::MarketShare), 0.25);
        assert_eq!(snapshot.get(Metric::TrustInNewcomers), 0.5);
        assert_eq!(snapshot.get(Metric::PlayRate), 0.0);
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let json = serde_json::to_value(MetricsSnapshot::default()).unwrap();
        for metric in Metric::ALL {
            assert!(json.get(metric.name()).is_some(), "missing {}", metric);
        }
    }
}
