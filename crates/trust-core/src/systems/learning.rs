//! Finalize Phase
//!
//! Learning from this tick's exchange and leaving the market.

use crate::components::agent::{Agent, AgentId};
use crate::components::partition::Partition;
use crate::SimRng;

/// One agent's finalize phase. Paired agents learn, imitating their
/// neighbourhood's role model unless they are the role model themselves;
/// every agent then leaves the market.
pub fn finalize_agent(id: AgentId, agents: &mut [Agent], partition: &mut Partition, rng: &mut SimRng) {
    let cell = agents[id.index()].neighbourhood();
    let role_model = partition
        .role_model(cell, agents)
        .filter(|&model| model != id)
        .map(|model| agents[model.index()].propensities());

    let agent = &mut agents[id.index()];
    agent.finalize(role_model, rng);
    partition.leave_market(agent);
}
