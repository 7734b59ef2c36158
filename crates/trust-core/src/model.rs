//! Simulation Model
//!
//! Owns the agent arena, the partition, the scheduler and the single random
//! stream of a run, and drives ticks through decide, pair and play, metric
//! recording and finalize.

use tracing::{debug, info};

use trust_metrics::{MetricsSeries, MetricsSnapshot};

use crate::components::agent::{Agent, AgentId};
use crate::components::partition::Partition;
use crate::components::payoff::PayoffTable;
use crate::config::ModelConfig;
use crate::error::EngineError;
use crate::output::metrics;
use crate::setup::spawn_population;
use crate::systems::{self, PairingSummary, TwoPhaseScheduler};
use crate::SimRng;

/// One simulation run.
#[derive(Debug)]
pub struct Model {
    config: ModelConfig,
    payoffs: PayoffTable,
    agents: Vec<Agent>,
    partition: Partition,
    scheduler: TwoPhaseScheduler,
    rng: SimRng,
    record: bool,
    series: MetricsSeries,
    last_pairing: PairingSummary,
    completed: bool,
}

impl Model {
    /// Validates `config` and spawns the population, seeding the random
    /// stream from `config.seed`.
    pub fn new(config: ModelConfig) -> Result<Self, EngineError> {
        let mut rng = SimRng::seed_from_u64(config.seed);
        let (agents, partition) = spawn_population(&config, &mut rng)?;
        let scheduler = TwoPhaseScheduler::new(agents.len(), config.activation);

        info!(
            population = %config.agent_kind,
            num_agents = config.num_agents,
            neighbourhoods = partition.num_neighbourhoods(),
            mobility_rate = config.mobility_rate,
            seed = config.seed,
            "model created"
        );

        Ok(Self {
            config,
            payoffs: PayoffTable::default(),
            agents,
            partition,
            scheduler,
            rng,
            record: false,
            series: MetricsSeries::new(),
            last_pairing: PairingSummary::default(),
            completed: false,
        })
    }

    /// Advances one tick: every agent decides, the partition pairs and plays,
    /// metrics are recorded when recording, then every agent finalizes.
    pub fn step(&mut self) -> Result<(), EngineError> {
        let mobility_rate = self.config.mobility_rate;

        let agents = &mut self.agents;
        let partition = &mut self.partition;
        self.scheduler.step(&mut self.rng, |id, rng| {
            systems::decide(&mut agents[id.index()], partition, mobility_rate, rng);
        })?;

        self.last_pairing =
            systems::pair_and_play(&mut self.partition, &mut self.agents, &self.payoffs, &mut self.rng);

        if self.record {
            self.series.push(self.metrics());
        }

        let agents = &mut self.agents;
        let partition = &mut self.partition;
        self.scheduler.finalize(&mut self.rng, |id, rng| {
            systems::finalize_agent(id, agents, partition, rng);
        })?;

        debug!(
            step = self.scheduler.steps(),
            market = self.last_pairing.market_pairs * 2,
            local_pairs = self.last_pairing.local_pairs,
            unpaired = self.last_pairing.unpaired,
            "tick complete"
        );
        Ok(())
    }

    /// Runs `onset` unrecorded ticks, then `recorded` ticks with one metrics
    /// snapshot each. A model runs at most once.
    pub fn run(&mut self, onset: u64, recorded: u64) -> Result<&MetricsSeries, EngineError> {
        if self.completed {
            return Err(EngineError::AlreadyRun);
        }
        self.completed = true;

        self.record = false;
        for _ in 0..onset {
            self.step()?;
        }
        info!(steps = onset, "onset finished, recording started");

        self.record = true;
        for _ in 0..recorded {
            self.step()?;
        }
        self.record = false;

        info!(
            steps = self.scheduler.steps(),
            recorded = self.series.len(),
            "run complete"
        );
        Ok(&self.series)
    }

    /// Metrics of the current tick. Only meaningful between pairing and the
    /// finalize phase; callers read recorded ticks through [`Model::series`].
    pub(crate) fn metrics(&self) -> MetricsSnapshot {
        metrics::snapshot(self.scheduler.steps(), &self.agents)
    }

    /// The recorded series.
    pub fn series(&self) -> &MetricsSeries {
        &self.series
    }

    /// Trust propensity of every agent, by id.
    pub fn trust_propensities(&self) -> Vec<f64> {
        self.agents.iter().map(|a| a.propensities().trust).collect()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn payoffs(&self) -> &PayoffTable {
        &self.payoffs
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    /// Mutable access to an agent, for preparing scenarios before a run.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn scheduler(&self) -> &TwoPhaseScheduler {
        &self.scheduler
    }

    /// Completed ticks.
    pub fn steps(&self) -> u64 {
        self.scheduler.steps()
    }

    pub fn is_recording(&self) -> bool {
        self.record
    }

    /// Pair counts of the most recent tick.
    pub fn last_pairing(&self) -> PairingSummary {
        self.last_pairing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn small_config() -> ModelConfig {
        ModelConfig {
            num_agents: 40,
            neighbourhood_size: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ModelConfig {
            num_agents: 10,
            neighbourhood_size: 20,
            ..Default::default()
        };
        assert!(matches!(
            Model::new(config),
            Err(EngineError::Config(ConfigError::NeighbourhoodTooLarge { .. }))
        ));
    }

    #[test]
    fn test_run_records_only_after_onset() {
        let mut model = Model::new(small_config()).unwrap();
        let series = model.run(5, 7).unwrap();

        assert_eq!(series.len(), 7);
        let steps: Vec<u64> = series.snapshots.iter().map(|s| s.step).collect();
        assert_eq!(steps, (5..12).collect::<Vec<u64>>());
        assert_eq!(model.steps(), 12);
        assert_eq!(model.scheduler().time(), 12.0);
        assert!(!model.is_recording());
    }

    #[test]
    fn test_run_twice_is_rejected() {
        let mut model = Model::new(small_config()).unwrap();
        model.run(1, 1).unwrap();
        assert!(matches!(model.run(1, 1), Err(EngineError::AlreadyRun)));
    }

    #[test]
    fn test_market_cleared_after_every_tick() {
        let mut model = Model::new(small_config()).unwrap();
        for _ in 0..10 {
            model.step().unwrap();
            assert_eq!(model.partition().market_len(), 0);
            assert!(model.agents().iter().all(|a| !a.in_market() && !a.is_paired()));
        }
    }

    #[test]
    fn test_recorded_metrics_are_rates() {
        let mut model = Model::new(small_config()).unwrap();
        let series = model.run(3, 20).unwrap();
        for snapshot in &series.snapshots {
            for value in [
                snapshot.market_share,
                snapshot.play_rate,
                snapshot.cooperation_rate,
                snapshot.trust_in_strangers,
                snapshot.trust_in_neighbours,
                snapshot.trust_in_newcomers,
                snapshot.mean_trust_propensity,
            ] {
                assert!((0.0..=1.0).contains(&value), "{:?}", snapshot);
            }
        }
    }

    #[test]
    fn test_propensities_stay_in_unit_interval() {
        for kind in ["naive_trust", "signal_parochial", "reinforcement", "gossip", "reinforcement_gossip"] {
            let config = ModelConfig {
                agent_kind: kind.parse().unwrap(),
                relative_reward: true,
                ..small_config()
            };
            let mut model = Model::new(config).unwrap();
            model.run(0, 30).unwrap();
            for agent in model.agents() {
                let p = agent.propensities();
                for value in [p.trust, p.cooperativeness, p.market] {
                    assert!(value.is_finite() && (0.0..=1.0).contains(&value), "{}: {:?}", kind, p);
                }
            }
        }
    }
}
