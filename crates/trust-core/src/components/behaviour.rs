//! Behaviour Components
//!
//! The four behavioural variants (and the reinforcement/reputation mix) are
//! compositions of three independent parts: a play rule, a learning rule, and
//! an optional reputation memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::components::memory::ReputationMemory;
use crate::config::ModelConfig;
use crate::error::ConfigError;

/// Behavioural variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Plays iff a draw against the trust propensity succeeds
    #[serde(alias = "MSAgent")]
    NaiveTrust,
    /// Reads signals or acts parochially, stochastic learning
    #[serde(alias = "WHAgent")]
    SignalParochial,
    /// Signal/parochial play rule with reinforcement learning
    #[serde(alias = "RLAgent")]
    Reinforcement,
    /// Signal/parochial play rule behind a reputation memory
    #[serde(alias = "GossipAgent")]
    Gossip,
    /// Reinforcement learning combined with a reputation memory
    #[serde(alias = "RLGossipAgent")]
    ReinforcementGossip,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::NaiveTrust,
        AgentKind::SignalParochial,
        AgentKind::Reinforcement,
        AgentKind::Gossip,
        AgentKind::ReinforcementGossip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::NaiveTrust => "naive_trust",
            AgentKind::SignalParochial => "signal_parochial",
            AgentKind::Reinforcement => "reinforcement",
            AgentKind::Gossip => "gossip",
            AgentKind::ReinforcementGossip => "reinforcement_gossip",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            AgentKind::NaiveTrust => "MSAgent",
            AgentKind::SignalParochial => "WHAgent",
            AgentKind::Reinforcement => "RLAgent",
            AgentKind::Gossip => "GossipAgent",
            AgentKind::ReinforcementGossip => "RLGossipAgent",
        }
    }

    pub fn uses_memory(self) -> bool {
        matches!(self, AgentKind::Gossip | AgentKind::ReinforcementGossip)
    }

    pub fn uses_reinforcement(self) -> bool {
        matches!(self, AgentKind::Reinforcement | AgentKind::ReinforcementGossip)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AgentKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s) || k.alias().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownAgentKind(s.to_string()))
    }
}

/// How the play/exit decision is made when no memory applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRule {
    Naive,
    SignalParochial,
}

/// Exponentially discounted running average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountedAverage {
    pub discount_factor: f64,
    sum: f64,
    count: f64,
}

impl DiscountedAverage {
    pub fn new(discount_factor: f64) -> Self {
        Self {
            discount_factor,
            sum: 0.0,
            count: 0.0,
        }
    }

    pub fn record(&mut self, value: f64) {
        self.sum = value + self.discount_factor * self.sum;
        self.count = 1.0 + self.discount_factor * self.count;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0.0).then(|| self.sum / self.count)
    }
}

/// How a propensity is reinforced by a payoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LearningRule {
    /// `p + (1 - p) * payoff` for gains, `p + p * payoff` for losses
    Stochastic,
    /// The stochastic rule scaled by a learning rate, optionally learning from
    /// the payoff relative to a discounted running average
    Reinforcement {
        learning_rate: f64,
        relative_reward: bool,
        baseline: DiscountedAverage,
    },
}

impl LearningRule {
    /// Feeds a received payoff into the relative-reward baseline.
    pub fn observe(&mut self, payoff: f64) {
        if let LearningRule::Reinforcement { baseline, .. } = self {
            baseline.record(payoff);
        }
    }

    /// Reinforces probability `p` by `payoff`.
    pub fn reinforce(&self, p: f64, payoff: f64) -> f64 {
        let (rate, payoff) = match self {
            LearningRule::Stochastic => (1.0, payoff),
            LearningRule::Reinforcement {
                learning_rate,
                relative_reward,
                baseline,
            } => {
                let payoff = match (relative_reward, baseline.mean()) {
                    (true, Some(average)) => payoff - average,
                    _ => payoff,
                };
                (*learning_rate, payoff)
            }
        };

        if payoff >= 0.0 {
            p + rate * (1.0 - p) * payoff
        } else {
            p + rate * p * payoff
        }
    }
}

/// Payoff accumulator used only to elect role models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Standing {
    /// Plain running sum
    Sum(f64),
    /// Discounted running sum with its matching discounted counter
    Discounted(DiscountedAverage),
}

impl Standing {
    pub fn record(&mut self, payoff: f64) {
        match self {
            Standing::Sum(total) => *total += payoff,
            Standing::Discounted(average) => average.record(payoff),
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Standing::Sum(total) => *total,
            Standing::Discounted(average) => average.sum,
        }
    }

    pub fn reset(&mut self) {
        match self {
            Standing::Sum(total) => *total = 0.0,
            Standing::Discounted(average) => *average = DiscountedAverage::new(average.discount_factor),
        }
    }
}

/// The behaviour of one agent.
#[derive(Debug)]
pub struct Behaviour {
    pub kind: AgentKind,
    pub play_rule: PlayRule,
    pub learning: LearningRule,
    pub memory: Option<ReputationMemory>,
    /// Probability of imitating the role model instead of learning alone
    pub social_learning_rate: f64,
}

impl Behaviour {
    /// Builds the behaviour of `kind` from the configured parameters.
    ///
    /// A zero memory size is rejected by [`ModelConfig::validate`]; should one
    /// slip through, the agent is left without memory.
    pub fn for_kind(kind: AgentKind, config: &ModelConfig) -> Self {
        let play_rule = match kind {
            AgentKind::NaiveTrust => PlayRule::Naive,
            _ => PlayRule::SignalParochial,
        };
        let learning = if kind.uses_reinforcement() {
            LearningRule::Reinforcement {
                learning_rate: config.learning_rate,
                relative_reward: config.relative_reward,
                baseline: DiscountedAverage::new(config.discount_factor),
            }
        } else {
            LearningRule::Stochastic
        };
        let memory = if kind.uses_memory() {
            NonZeroUsize::new(config.memory_size).map(ReputationMemory::new)
        } else {
            None
        };

        Self {
            kind,
            play_rule,
            learning,
            memory,
            social_learning_rate: config.social_learning_rate,
        }
    }

    /// A fresh role-model accumulator matching the learning rule.
    pub fn new_standing(&self) -> Standing {
        match self.learning {
            LearningRule::Stochastic => Standing::Sum(0.0),
            LearningRule::Reinforcement { baseline, .. } => {
                Standing::Discounted(DiscountedAverage::new(baseline.discount_factor))
            }
        }
    }
}
