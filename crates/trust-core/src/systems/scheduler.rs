//! Two-Phase Scheduler
//!
//! Runs every agent's decide phase, then (after the caller has paired and
//! played) every agent's finalize phase, in the same traversal order.

use serde::{Deserialize, Serialize};

use crate::components::agent::AgentId;
use crate::error::EngineError;
use crate::SimRng;

/// Traversal order of agents within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Ascending agent id, every tick
    #[default]
    Fixed,
    /// A fresh uniform shuffle at the start of every tick
    Shuffled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Decided,
}

/// Drives the decide/finalize barrier and keeps simulation time.
#[derive(Debug, Clone)]
pub struct TwoPhaseScheduler {
    activation: Activation,
    order: Vec<AgentId>,
    phase: Phase,
    time: f64,
    steps: u64,
}

impl TwoPhaseScheduler {
    pub fn new(num_agents: usize, activation: Activation) -> Self {
        Self {
            activation,
            order: (0..num_agents).map(AgentId).collect(),
            phase: Phase::Idle,
            time: 0.0,
            steps: 0,
        }
    }

    /// Runs `decide` for every agent and advances half a tick.
    pub fn step<F>(&mut self, rng: &mut SimRng, mut decide: F) -> Result<(), EngineError>
    where
        F: FnMut(AgentId, &mut SimRng),
    {
        if self.phase == Phase::Decided {
            return Err(EngineError::StepBeforeFinalize);
        }
        if self.activation == Activation::Shuffled {
            rng.shuffle(&mut self.order);
        }
        for &id in &self.order {
            decide(id, rng);
        }
        self.phase = Phase::Decided;
        self.time += 0.5;
        Ok(())
    }

    /// Runs `finalize` for every agent in the order of the last step,
    /// advances the remaining half tick and counts the step.
    pub fn finalize<F>(&mut self, rng: &mut SimRng, mut finalize: F) -> Result<(), EngineError>
    where
        F: FnMut(AgentId, &mut SimRng),
    {
        if self.phase != Phase::Decided {
            return Err(EngineError::FinalizeBeforeStep);
        }
        for &id in &self.order {
            finalize(id, rng);
        }
        self.phase = Phase::Idle;
        self.time += 0.5;
        self.steps += 1;
        Ok(())
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Simulation time; each phase advances it by half a tick.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Completed ticks.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// True between `step` and `finalize`.
    pub fn mid_tick(&self) -> bool {
        self.phase == Phase::Decided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order_and_time() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut scheduler = TwoPhaseScheduler::new(4, Activation::Fixed);
        let mut decided = Vec::new();
        let mut finalized = Vec::new();

        scheduler.step(&mut rng, |id, _| decided.push(id)).unwrap();
        assert_eq!(scheduler.time(), 0.5);
        assert_eq!(scheduler.steps(), 0);
        assert!(scheduler.mid_tick());

        scheduler.finalize(&mut rng, |id, _| finalized.push(id)).unwrap();
        assert_eq!(scheduler.time(), 1.0);
        assert_eq!(scheduler.steps(), 1);

        let expected: Vec<AgentId> = (0..4).map(AgentId).collect();
        assert_eq!(decided, expected);
        assert_eq!(finalized, expected);
    }

    #[test]
    fn test_shuffled_finalize_follows_step_order() {
        let mut rng = SimRng::seed_from_u64(9);
        let mut scheduler = TwoPhaseScheduler::new(50, Activation::Shuffled);
        let mut decided = Vec::new();
        let mut finalized = Vec::new();

        scheduler.step(&mut rng, |id, _| decided.push(id)).unwrap();
        scheduler.finalize(&mut rng, |id, _| finalized.push(id)).unwrap();

        assert_eq!(decided, finalized);
        let mut sorted = decided.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).map(AgentId).collect::<Vec<_>>());
    }

    #[test]
    fn test_phase_misuse_is_rejected() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut scheduler = TwoPhaseScheduler::new(2, Activation::Fixed);

        assert!(matches!(
            scheduler.finalize(&mut rng, |_, _| {}),
            Err(EngineError::FinalizeBeforeStep)
        ));
        scheduler.step(&mut rng, |_, _| {}).unwrap();
        assert!(matches!(
            scheduler.step(&mut rng, |_, _| {}),
            Err(EngineError::StepBeforeFinalize)
        ));
        assert_eq!(scheduler.time(), 0.5);
    }
}
