//! Partition Components
//!
//! Neighbourhood membership, the cross-cutting market, and the cached role
//! model of each neighbourhood. Agents are referred to by id; the agents
//! themselves live in the model's arena.

use std::collections::BTreeSet;

use crate::components::agent::{Agent, AgentId, NeighbourhoodId};

/// One neighbourhood: its members and a lazily recomputed role model.
#[derive(Debug, Clone, Default)]
pub struct Neighbourhood {
    members: BTreeSet<AgentId>,
    role_model: Option<AgentId>,
    dirty: bool,
}

impl Neighbourhood {
    pub fn members(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn insert(&mut self, agent: AgentId) {
        self.members.insert(agent);
        self.dirty = true;
    }

    fn remove(&mut self, agent: AgentId) {
        self.members.remove(&agent);
        self.dirty = true;
    }

    /// The cached role model, recomputed first if membership changed.
    fn role_model(&mut self, agents: &[Agent]) -> Option<AgentId> {
        if self.dirty {
            self.role_model = elect(&self.members, agents);
            self.dirty = false;
        }
        self.role_model
    }

    fn refresh(&mut self, agents: &[Agent]) -> Option<AgentId> {
        self.dirty = true;
        self.role_model(agents)
    }
}

/// The member with the highest standing; ties go to the lowest id.
fn elect(members: &BTreeSet<AgentId>, agents: &[Agent]) -> Option<AgentId> {
    let mut best: Option<(AgentId, f64)> = None;
    for &id in members {
        let standing = agents[id.index()].standing();
        match best {
            Some((_, top)) if standing <= top => {}
            _ => best = Some((id, standing)),
        }
    }
    best.map(|(id, _)| id)
}

/// Assignment of agents to neighbourhoods and to this tick's market.
#[derive(Debug, Clone)]
pub struct Partition {
    neighbourhoods: Vec<Neighbourhood>,
    market: BTreeSet<AgentId>,
}

impl Partition {
    pub fn new(num_neighbourhoods: usize) -> Self {
        Self {
            neighbourhoods: vec![Neighbourhood::default(); num_neighbourhoods],
            market: BTreeSet::new(),
        }
    }

    pub fn num_neighbourhoods(&self) -> usize {
        self.neighbourhoods.len()
    }

    pub fn neighbourhood(&self, cell: NeighbourhoodId) -> &Neighbourhood {
        &self.neighbourhoods[cell.index()]
    }

    pub fn neighbourhoods(&self) -> &[Neighbourhood] {
        &self.neighbourhoods
    }

    pub fn market(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.market.iter().copied()
    }

    pub fn market_len(&self) -> usize {
        self.market.len()
    }

    pub fn in_market(&self, agent: AgentId) -> bool {
        self.market.contains(&agent)
    }

    /// Registers a freshly created agent in its starting neighbourhood.
    pub fn place(&mut self, agent: &Agent) {
        self.neighbourhoods[agent.neighbourhood().index()].insert(agent.id());
    }

    /// Moves `agent` to `to` and marks it a newcomer there. Both cells'
    /// role models are invalidated. Moving to the current cell is a no-op.
    pub fn move_agent(&mut self, agent: &mut Agent, to: NeighbourhoodId) {
        let from = agent.neighbourhood();
        if from == to {
            return;
        }
        self.neighbourhoods[from.index()].remove(agent.id());
        self.neighbourhoods[to.index()].insert(agent.id());
        agent.relocate(to);
    }

    pub fn enter_market(&mut self, agent: &mut Agent) {
        self.market.insert(agent.id());
        agent.in_market = true;
    }

    pub fn leave_market(&mut self, agent: &mut Agent) {
        self.market.remove(&agent.id());
        agent.in_market = false;
    }

    /// The role model of `cell`, or `None` when the cell is empty.
    pub fn role_model(&mut self, cell: NeighbourhoodId, agents: &[Agent]) -> Option<AgentId> {
        self.neighbourhoods[cell.index()].role_model(agents)
    }

    /// Re-elects every role model from current standings.
    pub fn refresh_role_models(&mut self, agents: &[Agent]) -> Vec<Option<AgentId>> {
        self.neighbourhoods
            .iter_mut()
            .map(|nbh| nbh.refresh(agents))
            .collect()
    }

    /// Members of `cell` that stay out of the market this tick, by id.
    pub fn local_candidates(&self, cell: NeighbourhoodId) -> Vec<AgentId> {
        self.neighbourhoods[cell.index()]
            .members()
            .filter(|id| !self.market.contains(id))
            .collect()
    }

    /// This tick's market participants, by id.
    pub fn market_candidates(&self) -> Vec<AgentId> {
        self.market.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::behaviour::{AgentKind, Behaviour};
    use crate::config::ModelConfig;
    use crate::SimRng;

    fn setup(n: usize, cells: usize) -> (Vec<Agent>, Partition) {
        let mut rng = SimRng::seed_from_u64(3);
        let config = ModelConfig::default();
        let mut partition = Partition::new(cells);
        let agents: Vec<Agent> = (0..n)
            .map(|i| {
                let behaviour = Behaviour::for_kind(AgentKind::SignalParochial, &config);
                let agent = Agent::new(AgentId(i), NeighbourhoodId(i % cells), behaviour, &mut rng);
                partition.place(&agent);
                agent
            })
            .collect();
        (agents, partition)
    }

    #[test]
    fn test_round_robin_placement() {
        let (_, partition) = setup(7, 3);
        let sizes: Vec<usize> = partition.neighbourhoods().iter().map(|n| n.len()).collect();
        assert_eq!(sizes, vec![3, 2, 2]);
        assert!(partition.neighbourhood(NeighbourhoodId(1)).contains(AgentId(4)));
    }

    #[test]
    fn test_move_agent() {
        let (mut agents, mut partition) = setup(4, 2);
        partition.move_agent(&mut agents[0], NeighbourhoodId(1));

        assert!(!partition.neighbourhood(NeighbourhoodId(0)).contains(AgentId(0)));
        assert!(partition.neighbourhood(NeighbourhoodId(1)).contains(AgentId(0)));
        assert_eq!(agents[0].neighbourhood(), NeighbourhoodId(1));
        assert!(agents[0].is_newcomer());

        let total: usize = partition.neighbourhoods().iter().map(|n| n.len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_move_to_same_cell_is_noop() {
        let (mut agents, mut partition) = setup(4, 2);
        partition.move_agent(&mut agents[1], NeighbourhoodId(1));
        assert!(!agents[1].is_newcomer());
        assert_eq!(partition.neighbourhood(NeighbourhoodId(1)).len(), 2);
    }

    #[test]
    fn test_market_is_idempotent_and_orthogonal() {
        let (mut agents, mut partition) = setup(4, 2);
        partition.enter_market(&mut agents[2]);
        partition.enter_market(&mut agents[2]);
        assert_eq!(partition.market_len(), 1);
        assert!(agents[2].in_market());
        assert!(partition.neighbourhood(NeighbourhoodId(0)).contains(AgentId(2)));

        assert_eq!(partition.local_candidates(NeighbourhoodId(0)), vec![AgentId(0)]);
        assert_eq!(partition.market_candidates(), vec![AgentId(2)]);

        partition.leave_market(&mut agents[2]);
        partition.leave_market(&mut agents[2]);
        assert_eq!(partition.market_len(), 0);
        assert!(!agents[2].in_market());
    }

    #[test]
    fn test_role_model_has_highest_standing() {
        let (mut agents, mut partition) = setup(6, 2);
        agents[2].standing.record(0.7);
        agents[4].standing.record(0.3);
        agents[0].standing.record(-0.2);

        let models = partition.refresh_role_models(&agents);
        assert_eq!(models[0], Some(AgentId(2)));
        // Cell 1 is all zeros: lowest id wins the tie
        assert_eq!(models[1], Some(AgentId(1)));

        let top = agents[2].standing();
        for id in partition.neighbourhood(NeighbourhoodId(0)).members() {
            assert!(top >= agents[id.index()].standing());
        }
    }

    #[test]
    fn test_role_model_cached_until_membership_changes() {
        let (mut agents, mut partition) = setup(4, 2);
        assert_eq!(partition.role_model(NeighbourhoodId(0), &agents), Some(AgentId(0)));

        // Standing alone does not invalidate the cache
        agents[2].standing.record(1.0);
        assert_eq!(partition.role_model(NeighbourhoodId(0), &agents), Some(AgentId(0)));

        // A membership change does
        partition.move_agent(&mut agents[3], NeighbourhoodId(0));
        assert_eq!(partition.role_model(NeighbourhoodId(0), &agents), Some(AgentId(2)));
    }

    #[test]
    fn test_empty_cell_has_no_role_model() {
        let (mut agents, mut partition) = setup(2, 2);
        partition.move_agent(&mut agents[1], NeighbourhoodId(0));
        assert!(partition.neighbourhood(NeighbourhoodId(1)).is_empty());
        assert_eq!(partition.role_model(NeighbourhoodId(1), &agents), None);
    }
}
