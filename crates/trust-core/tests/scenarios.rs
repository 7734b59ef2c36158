//! Scenario and invariant tests for the trust simulation.

use trust_core::components::PartnerView;
use trust_core::{
    opportunity_cost, Agent, AgentId, AgentKind, Choice, Metric, Model, ModelConfig,
    NeighbourhoodId, PayoffTable, PlayBasis, Population, SimRng, Venue,
};
use trust_core::components::Behaviour;

fn config(n: usize, size: usize, mobility: f64) -> ModelConfig {
    ModelConfig {
        num_agents: n,
        neighbourhood_size: size,
        mobility_rate: mobility,
        ..Default::default()
    }
}

/// Four agents in one neighbourhood without mobility never become newcomers
#[test]
fn test_scenario_static_neighbourhood() {
    let mut model = Model::new(config(4, 4, 0.0)).unwrap();
    assert_eq!(model.partition().num_neighbourhoods(), 1);

    for _ in 0..200 {
        model.step().unwrap();
        for agent in model.agents() {
            assert!(!agent.is_newcomer());
            assert_eq!(agent.neighbourhood(), NeighbourhoodId(0));
        }
    }
}

/// With mobility off, market membership follows the market-entry draw alone
#[test]
fn test_scenario_static_market_entry() {
    for (propensity, share) in [(0.0, 0.0), (1.0, 1.0)] {
        let mut model = Model::new(config(4, 4, 0.0)).unwrap();
        for i in 0..4 {
            model.agent_mut(AgentId(i)).unwrap().propensities_mut().market = propensity;
        }

        let series = model.run(0, 1).unwrap();
        assert_eq!(series.values(Metric::MarketShare).collect::<Vec<_>>(), vec![share]);
        assert_eq!(model.partition().market_len(), 0);
        assert!(model.agents().iter().all(|a| a.neighbourhood() == NeighbourhoodId(0)));
    }
}

/// Without mobility, trust in newcomers has nothing to measure and every
/// local partner is a known neighbour
#[test]
fn test_scenario_static_metrics() {
    let mut model = Model::new(ModelConfig {
        agent_kind: Population::Uniform(AgentKind::SignalParochial),
        ..config(4, 4, 0.0)
    })
    .unwrap();
    let series = model.run(0, 100).unwrap();

    assert!(series.values(Metric::TrustInNewcomers).all(|v| v == 0.0));
}

/// A pair in a population of two pays no opportunity cost for cooperating
#[test]
fn test_scenario_pair_population() {
    let model = Model::new(config(2, 2, 0.0)).unwrap();
    assert_eq!(model.partition().num_neighbourhoods(), 1);
    assert_eq!(opportunity_cost(2, 2), 0.0);
    assert_eq!(
        model.payoffs().exchange(Choice::Cooperate, Choice::Cooperate, opportunity_cost(2, 2)),
        0.7
    );
}

/// A reputation agent that remembers its opponent never reads a signal
#[test]
fn test_scenario_memory_overrides_signal_reading() {
    let mut rng = SimRng::seed_from_u64(99);
    let config = ModelConfig::default();

    for remembered in [true, false] {
        for _ in 0..50 {
            let behaviour = Behaviour::for_kind(AgentKind::Gossip, &config);
            let mut agent = Agent::new(AgentId(0), NeighbourhoodId(0), behaviour, &mut rng);
            agent.propensities_mut().trust = 1.0;
            agent
                .behaviour_mut()
                .memory
                .as_mut()
                .unwrap()
                .remember(AgentId(1), remembered);

            let partner = PartnerView {
                id: AgentId(1),
                newcomer: false,
                choice: Choice::Cooperate,
                cooperativeness: 1.0,
            };
            let play = agent.decide_play(&partner, Venue::Market, Some(!remembered), &mut rng);

            assert_eq!(play, remembered);
            assert_eq!(agent.encounter().unwrap().basis, PlayBasis::Memory);
        }
    }
}

/// Each agent sits in exactly one neighbourhood and the market is empty
/// between ticks
#[test]
fn test_membership_invariants_under_mobility() {
    let mut model = Model::new(ModelConfig {
        agent_kind: Population::Mixed(AgentKind::ALL.to_vec()),
        ..config(100, 10, 0.3)
    })
    .unwrap();

    for _ in 0..50 {
        model.step().unwrap();

        let partition = model.partition();
        let total: usize = partition.neighbourhoods().iter().map(|n| n.len()).sum();
        assert_eq!(total, 100);
        for agent in model.agents() {
            let homes = partition
                .neighbourhoods()
                .iter()
                .filter(|n| n.contains(agent.id()))
                .count();
            assert_eq!(homes, 1);
            assert!(partition.neighbourhood(agent.neighbourhood()).contains(agent.id()));
        }
        assert_eq!(partition.market_len(), 0);
    }
}

/// With mobility some agents arrive as newcomers
#[test]
fn test_mobility_produces_newcomers() {
    let mut model = Model::new(config(100, 10, 0.5)).unwrap();
    model.step().unwrap();
    let newcomers = model.agents().iter().filter(|a| a.is_newcomer()).count();
    assert!(newcomers > 0 && newcomers < 100);
}

/// The payoff table holds the fixed constants
#[test]
fn test_payoff_constants() {
    let table = PayoffTable::default();
    assert_eq!(table.lookup(Choice::Defect, Choice::Cooperate), 1.0);
    assert_eq!(table.lookup(Choice::Cooperate, Choice::Cooperate), 0.7);
    assert_eq!(table.lookup(Choice::Defect, Choice::Defect), -0.2);
    assert_eq!(table.lookup(Choice::Cooperate, Choice::Defect), -0.5);
    assert_eq!(table.exit, -0.2);
}

/// The series returned by a run stays readable from the model
#[test]
fn test_series_outlives_run() {
    let mut model = Model::new(config(50, 10, 0.2)).unwrap();
    let recorded = model.run(0, 10).unwrap().clone();
    assert_eq!(recorded.len(), 10);
    assert_eq!(model.series(), &recorded);
    assert!(recorded.values(Metric::PlayRate).any(|v| v > 0.0));
}
