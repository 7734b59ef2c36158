//! Decide Phase
//!
//! Involuntary moves between neighbourhoods and market entry.

use crate::components::agent::{Agent, NeighbourhoodId};
use crate::components::partition::Partition;
use crate::SimRng;

/// One agent's decide phase: a mobility draw (followed by a destination draw
/// when it moves), then a market-entry draw.
pub fn decide(agent: &mut Agent, partition: &mut Partition, mobility_rate: f64, rng: &mut SimRng) {
    if rng.chance(mobility_rate) {
        let to = destination(agent.neighbourhood(), partition.num_neighbourhoods(), rng);
        partition.move_agent(agent, to);
    } else {
        agent.stay();
    }

    if rng.chance(agent.propensities().market) {
        partition.enter_market(agent);
    }
}

/// A uniformly drawn neighbourhood other than `current`.
///
/// Requires at least two neighbourhoods; with fewer the agent stays put.
pub fn destination(current: NeighbourhoodId, count: usize, rng: &mut SimRng) -> NeighbourhoodId {
    if count < 2 {
        return current;
    }
    let draw = rng.below(count - 1);
    if draw >= current.index() {
        NeighbourhoodId(draw + 1)
    } else {
        NeighbourhoodId(draw)
    }
}
