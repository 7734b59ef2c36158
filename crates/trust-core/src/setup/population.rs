//! Population Spawning
//!
//! Creates agents in id order, each drawing its propensities, and places
//! them round-robin over the neighbourhoods.

use tracing::debug;

use crate::components::agent::{Agent, AgentId, NeighbourhoodId};
use crate::components::behaviour::Behaviour;
use crate::components::partition::Partition;
use crate::config::ModelConfig;
use crate::error::ConfigError;
use crate::SimRng;

/// Spawns the population described by `config` and its partition.
///
/// Agent `i` starts in neighbourhood `i % num_neighbourhoods` with the
/// variant `config.agent_kind.kind_for(i)`.
pub fn spawn_population(
    config: &ModelConfig,
    rng: &mut SimRng,
) -> Result<(Vec<Agent>, Partition), ConfigError> {
    config.validate()?;

    let num_neighbourhoods = config.num_neighbourhoods();
    let mut partition = Partition::new(num_neighbourhoods);
    let mut agents = Vec::with_capacity(config.num_agents);

    for i in 0..config.num_agents {
        let kind = config.agent_kind.kind_for(i).ok_or(ConfigError::EmptyMix)?;
        let behaviour = Behaviour::for_kind(kind, config);
        let agent = Agent::new(
            AgentId(i),
            NeighbourhoodId(i % num_neighbourhoods),
            behaviour,
            rng,
        );
        partition.place(&agent);
        agents.push(agent);
    }

    debug!(
        agents = agents.len(),
        neighbourhoods = num_neighbourhoods,
        population = %config.agent_kind,
        "population spawned"
    );
    Ok((agents, partition))
}
