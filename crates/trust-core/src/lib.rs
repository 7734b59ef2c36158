//! Core simulation logic: agents, neighbourhoods, the market, pairing and
//! two-phase scheduling for repeated trust games among mobile agents.
//!
//! A [`Model`] owns every agent in a dense arena and refers to them by
//! [`AgentId`]. Each tick runs the decide phase for all agents, pairs and
//! plays within neighbourhoods and the market, optionally records metrics,
//! then runs the finalize phase in which agents learn.

pub mod components;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod setup;
pub mod systems;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub use components::{
    opportunity_cost, Agent, AgentId, AgentKind, Choice, Encounter, Neighbourhood,
    NeighbourhoodId, Partition, PayoffTable, PlayBasis, Propensities, ReputationMemory, Venue,
};
pub use config::{ModelConfig, Population};
pub use error::{ConfigError, EngineError};
pub use model::Model;
pub use output::{write_report, RunReport};
pub use setup::spawn_population;
pub use systems::{Activation, PairingSummary, TwoPhaseScheduler};
pub use trust_metrics::{Metric, MetricsSeries, MetricsSnapshot};

/// Seeded random number generator shared by every draw of a run.
///
/// Draw order is part of the model: reordering calls changes outcomes.
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Uniform draw in [0, 1).
    pub fn unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// Bernoulli draw that succeeds with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform index in `0..n`. `n` must be positive.
    pub fn below(&mut self, n: usize) -> usize {
        self.0.gen_range(0..n)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }
}
