//! Model configuration.
//!
//! Every parameter of a run, loadable from TOML with per-field defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::components::behaviour::AgentKind;
use crate::error::ConfigError;
use crate::systems::scheduler::Activation;

/// Which behavioural variants make up the population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Population {
    /// Every agent shares one variant
    Uniform(AgentKind),
    /// Agent `i` receives `kinds[i % kinds.len()]`
    Mixed(Vec<AgentKind>),
}

impl Population {
    /// The variant of the agent at `index`.
    pub fn kind_for(&self, index: usize) -> Option<AgentKind> {
        match self {
            Population::Uniform(kind) => Some(*kind),
            Population::Mixed(kinds) if kinds.is_empty() => None,
            Population::Mixed(kinds) => Some(kinds[index % kinds.len()]),
        }
    }

    pub fn kinds(&self) -> &[AgentKind] {
        match self {
            Population::Uniform(kind) => std::slice::from_ref(kind),
            Population::Mixed(kinds) => kinds,
        }
    }

    pub fn uses_memory(&self) -> bool {
        self.kinds().iter().any(|k| k.uses_memory())
    }
}

impl Default for Population {
    fn default() -> Self {
        Population::Uniform(AgentKind::SignalParochial)
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds().iter().map(|k| k.name()).collect();
        f.write_str(&names.join(","))
    }
}

/// Parses a single variant name or a comma separated mix.
impl FromStr for Population {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kinds = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<AgentKind>, _>>()?;
        match kinds.as_slice() {
            [] => Err(ConfigError::EmptyMix),
            [kind] => Ok(Population::Uniform(*kind)),
            _ => Ok(Population::Mixed(kinds)),
        }
    }
}

/// Complete configuration of one model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Behavioural variant, or a mix of variants
    pub agent_kind: Population,
    /// Population size N
    pub num_agents: usize,
    /// Nominal neighbourhood size; the number of neighbourhoods is N / size
    pub neighbourhood_size: usize,
    /// Per-tick probability of moving to another neighbourhood
    pub mobility_rate: f64,
    /// Probability of imitating the role model, per propensity
    pub social_learning_rate: f64,
    /// Step size of reinforcement learners
    pub learning_rate: f64,
    /// Discount of the running payoff averages
    pub discount_factor: f64,
    /// Reinforcement learners learn from payoff relative to their average
    pub relative_reward: bool,
    /// Capacity of the reputation memory
    pub memory_size: usize,
    /// Agent traversal order within each phase
    pub activation: Activation,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            agent_kind: Population::default(),
            num_agents: 1000,
            neighbourhood_size: 50,
            mobility_rate: 0.2,
            social_learning_rate: 0.5,
            learning_rate: 0.02,
            discount_factor: 0.9,
            relative_reward: false,
            memory_size: 25,
            activation: Activation::default(),
            seed: 42,
        }
    }
}

impl ModelConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialises the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Number of neighbourhoods, `floor(N / neighbourhood_size)`.
    pub fn num_neighbourhoods(&self) -> usize {
        self.num_agents / self.neighbourhood_size.max(1)
    }

    /// Rejects configurations the model cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_agents < 2 {
            return Err(ConfigError::PopulationTooSmall(self.num_agents));
        }
        if self.neighbourhood_size == 0 {
            return Err(ConfigError::ZeroNeighbourhoodSize);
        }
        if self.neighbourhood_size > self.num_agents {
            return Err(ConfigError::NeighbourhoodTooLarge {
                neighbourhood_size: self.neighbourhood_size,
                num_agents: self.num_agents,
            });
        }

        let rates = [
            ("mobility_rate", self.mobility_rate),
            ("social_learning_rate", self.social_learning_rate),
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }

        if self.agent_kind.kinds().is_empty() {
            return Err(ConfigError::EmptyMix);
        }
        if self.memory_size == 0 && self.agent_kind.uses_memory() {
            return Err(ConfigError::ZeroMemorySize);
        }
        if self.mobility_rate > 0.0 && self.num_neighbourhoods() < 2 {
            return Err(ConfigError::NoDestination(self.mobility_rate));
        }
        Ok(())
    }
}
