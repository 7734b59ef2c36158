//! Error types for configuration and engine misuse.
//!
//! Degenerate simulation states (an empty rate denominator, an empty
//! neighbourhood without a role model) are not errors; they resolve to
//! `0.0` or `None` where they occur.

use thiserror::Error;

/// Invalid model configuration, rejected at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Opportunity cost divides by `N - 1`
    #[error("population must contain at least 2 agents, got {0}")]
    PopulationTooSmall(usize),

    #[error("neighbourhood size must be positive")]
    ZeroNeighbourhoodSize,

    #[error("neighbourhood size {neighbourhood_size} exceeds population {num_agents}")]
    NeighbourhoodTooLarge {
        neighbourhood_size: usize,
        num_agents: usize,
    },

    #[error("{name} must lie in [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("memory size must be positive for reputation agents")]
    ZeroMemorySize,

    /// Moving requires a neighbourhood other than the current one
    #[error("mobility rate {0} requires at least two neighbourhoods")]
    NoDestination(f64),

    #[error("unknown agent kind: {0}")]
    UnknownAgentKind(String),

    #[error("mixed population needs at least one agent kind")]
    EmptyMix,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while driving a model.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("finalize called before step")]
    FinalizeBeforeStep,

    #[error("step called again before finalize")]
    StepBeforeFinalize,

    #[error("model has already completed a run")]
    AlreadyRun,
}
