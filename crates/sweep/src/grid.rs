//! Parameter Grid
//!
//! Crosses neighbourhood sizes (outer) with mobility rates (inner), runs one
//! model per grid point and averages its recorded metrics.

use serde::{Deserialize, Serialize};
use tracing::info;

use trust_core::{Model, ModelConfig};
use trust_metrics::{Metric, MetricsSeries};

use crate::config::SweepConfig;
use crate::SweepError;

/// Metrics written per grid point, in column order.
pub const COLUMNS: [Metric; 7] = [
    Metric::MarketShare,
    Metric::TrustInStrangers,
    Metric::MeanTrustPropensity,
    Metric::PlayRate,
    Metric::CooperationRate,
    Metric::TrustInNeighbours,
    Metric::TrustInNewcomers,
];

/// One combination of swept parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub index: usize,
    pub neighbourhood_size: usize,
    pub mobility_rate: f64,
}

impl GridPoint {
    /// The model configuration of this point.
    pub fn model_config(&self, base: &ModelConfig) -> ModelConfig {
        ModelConfig {
            neighbourhood_size: self.neighbourhood_size,
            mobility_rate: self.mobility_rate,
            seed: base.seed.wrapping_add(self.index as u64),
            ..base.clone()
        }
    }
}

/// Mean of every column over the recorded ticks of one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridResult {
    pub point: GridPoint,
    pub means: [f64; 7],
}

impl GridResult {
    pub fn from_series(point: GridPoint, series: &MetricsSeries) -> Self {
        Self {
            point,
            means: COLUMNS.map(|metric| series.mean(metric)),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        COLUMNS
            .iter()
            .position(|&m| m == metric)
            .map(|i| self.means[i])
    }
}

/// All grid points of `config`, neighbourhood size outermost.
pub fn grid(config: &SweepConfig) -> Vec<GridPoint> {
    let rates = config.mobility_rates.values();
    config
        .neighbourhood_sizes
        .values()
        .into_iter()
        .flat_map(|size| rates.iter().map(move |&rate| (size, rate)))
        .enumerate()
        .map(|(index, (neighbourhood_size, mobility_rate))| GridPoint {
            index,
            neighbourhood_size,
            mobility_rate,
        })
        .collect()
}

/// Runs one model at `point`.
pub fn run_point(config: &SweepConfig, point: GridPoint) -> Result<GridResult, SweepError> {
    let mut model = Model::new(point.model_config(&config.model))?;
    let series = model.run(config.onset, config.recorded)?;
    Ok(GridResult::from_series(point, series))
}

/// Runs every grid point in order, handing each result to `on_result` as
/// soon as it is available.
pub fn run_sweep<F>(config: &SweepConfig, mut on_result: F) -> Result<Vec<GridResult>, SweepError>
where
    F: FnMut(&GridResult) -> Result<(), SweepError>,
{
    config.validate()?;
    let points = grid(config);
    info!(
        points = points.len(),
        num_agents = config.model.num_agents,
        population = %config.model.agent_kind,
        "sweep started"
    );

    let mut results = Vec::with_capacity(points.len());
    for point in points {
        info!(
            neighbourhood_size = point.neighbourhood_size,
            mobility_rate = point.mobility_rate,
            "running grid point"
        );
        let result = run_point(config, point)?;
        on_result(&result)?;
        results.push(result);
    }

    info!(points = results.len(), "sweep complete");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RateRange, SizeRange};
    use trust_metrics::MetricsSnapshot;

    fn tiny_config() -> SweepConfig {
        SweepConfig {
            onset: 2,
            recorded: 5,
            neighbourhood_sizes: SizeRange {
                min: 5,
                max: 10,
                step: 5,
            },
            mobility_rates: RateRange {
                min: 0.0,
                max: 0.2,
                step: 0.1,
            },
            model: ModelConfig {
                num_agents: 20,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_grid_order() {
        let points = grid(&tiny_config());
        assert_eq!(points.len(), 6);
        let sizes: Vec<usize> = points.iter().map(|p| p.neighbourhood_size).collect();
        assert_eq!(sizes, vec![5, 5, 5, 10, 10, 10]);
        assert_eq!(points[1].mobility_rate, 0.1);
        assert_eq!(points[5].index, 5);
    }

    #[test]
    fn test_point_config_overrides() {
        let config = tiny_config();
        let point = grid(&config)[4];
        let model = point.model_config(&config.model);
        assert_eq!(model.neighbourhood_size, 10);
        assert_eq!(model.mobility_rate, 0.1);
        assert_eq!(model.seed, config.model.seed + 4);
        assert_eq!(model.num_agents, 20);
    }

    #[test]
    fn test_result_columns() {
        let mut series = MetricsSeries::new();
        for share in [0.2, 0.4] {
            series.push(MetricsSnapshot {
                market_share: share,
                trust_in_newcomers: 1.0,
                ..Default::default()
            });
        }
        let point = GridPoint {
            index: 0,
            neighbourhood_size: 5,
            mobility_rate: 0.0,
        };
        let result = GridResult::from_series(point, &series);
        assert!((result.means[0] - 0.3).abs() < 1e-12);
        assert_eq!(result.means[6], 1.0);
        assert_eq!(result.get(Metric::TrustInNewcomers), Some(1.0));
    }

    #[test]
    fn test_run_sweep_reports_every_point() {
        let config = tiny_config();
        let mut seen = 0;
        let results = run_sweep(&config, |_| {
            seen += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, 6);
        assert_eq!(results.len(), 6);
        for result in &results {
            assert!(result.means.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
