//! Pairing and Play
//!
//! Shuffles each neighbourhood's stay-at-home members and the market, pairs
//! them consecutively, and resolves one exchange per pair.

use tracing::trace;

use crate::components::agent::{Agent, AgentId, NeighbourhoodId, Venue};
use crate::components::partition::Partition;
use crate::components::payoff::{opportunity_cost, PayoffTable};
use crate::SimRng;

/// Result of pairing one candidate set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    pub pairs: usize,
    /// The agent left over from an odd-sized set
    pub unpaired: Option<AgentId>,
}

/// Totals of one tick's pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingSummary {
    pub local_pairs: usize,
    pub market_pairs: usize,
    pub unpaired: usize,
}

impl PairingSummary {
    fn add(&mut self, venue: Venue, outcome: RoundOutcome) {
        match venue {
            Venue::Neighbourhood => self.local_pairs += outcome.pairs,
            Venue::Market => self.market_pairs += outcome.pairs,
        }
        self.unpaired += usize::from(outcome.unpaired.is_some());
    }
}

/// Refreshes every role model, plays each neighbourhood among the members
/// not in the market, then plays the market. Every agent takes part in at
/// most one exchange.
pub fn pair_and_play(
    partition: &mut Partition,
    agents: &mut [Agent],
    payoffs: &PayoffTable,
    rng: &mut SimRng,
) -> PairingSummary {
    let role_models = partition.refresh_role_models(agents);
    let mut summary = PairingSummary::default();

    for cell in 0..partition.num_neighbourhoods() {
        let candidates = partition.local_candidates(NeighbourhoodId(cell));
        let outcome = play_round(
            candidates,
            Venue::Neighbourhood,
            agents,
            &role_models,
            payoffs,
            rng,
        );
        summary.add(Venue::Neighbourhood, outcome);
    }

    let outcome = play_round(
        partition.market_candidates(),
        Venue::Market,
        agents,
        &role_models,
        payoffs,
        rng,
    );
    summary.add(Venue::Market, outcome);
    summary
}

/// Shuffles `candidates`, pairs them consecutively and plays each pair.
///
/// The opportunity cost is derived from the size of this set; the population
/// size is the length of `agents`.
pub fn play_round(
    mut candidates: Vec<AgentId>,
    venue: Venue,
    agents: &mut [Agent],
    role_models: &[Option<AgentId>],
    payoffs: &PayoffTable,
    rng: &mut SimRng,
) -> RoundOutcome {
    rng.shuffle(&mut candidates);
    let cost = opportunity_cost(candidates.len(), agents.len());

    let pairs = candidates.chunks_exact(2);
    let unpaired = pairs.remainder().first().copied();
    let mut count = 0;
    for pair in pairs {
        exchange(pair[0], pair[1], venue, cost, agents, role_models, payoffs, rng);
        count += 1;
    }

    trace!(?venue, size = candidates.len(), pairs = count, "round played");
    RoundOutcome {
        pairs: count,
        unpaired,
    }
}

/// One exchange: both cooperation draws, both play decisions, then payoffs.
#[allow(clippy::too_many_arguments)]
fn exchange(
    a: AgentId,
    b: AgentId,
    venue: Venue,
    cost: f64,
    agents: &mut [Agent],
    role_models: &[Option<AgentId>],
    payoffs: &PayoffTable,
    rng: &mut SimRng,
) {
    let a_choice = agents[a.index()].decide_cooperation(rng);
    let b_choice = agents[b.index()].decide_cooperation(rng);

    let b_view = agents[b.index()].partner_view();
    let advice = advice_for(a, b, agents, role_models);
    let a_play = agents[a.index()].decide_play(&b_view, venue, advice, rng);

    let a_view = agents[a.index()].partner_view();
    let advice = advice_for(b, a, agents, role_models);
    let b_play = agents[b.index()].decide_play(&a_view, venue, advice, rng);

    let (a_payoff, b_payoff) = payoffs.settle((a_choice, a_play), (b_choice, b_play), cost);
    agents[a.index()].receive_payoff(a_payoff, b_play);
    agents[b.index()].receive_payoff(b_payoff, a_play);
}

/// What the role model of `agent`'s neighbourhood remembers about `partner`.
/// Only agents with a memory of their own ask.
fn advice_for(
    agent: AgentId,
    partner: AgentId,
    agents: &[Agent],
    role_models: &[Option<AgentId>],
) -> Option<bool> {
    let asker = &agents[agent.index()];
    asker.behaviour().memory.as_ref()?;
    let model = role_models.get(asker.neighbourhood().index()).copied().flatten()?;
    agents[model.index()].recollection_of(partner)
}
