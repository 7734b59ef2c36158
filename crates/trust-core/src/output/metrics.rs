//! Metric Computation
//!
//! Rates over this tick's exchanges. Every rate with an empty denominator
//! reports `0.0`.

use trust_metrics::MetricsSnapshot;

use crate::components::agent::{Agent, Choice, Encounter, Venue};

/// Fraction of `encounters` matching `subset` in which the agent played.
fn play_rate<'a>(
    encounters: impl Iterator<Item = &'a Encounter>,
    subset: impl Fn(&Encounter) -> bool,
) -> f64 {
    let (played, total) = encounters
        .filter(|e| subset(*e))
        .fold((0usize, 0usize), |(played, total), e| {
            (played + usize::from(e.play), total + 1)
        });
    ratio(played, total)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Computes the metrics of the current tick. Call between pairing and the
/// finalize phase; calling it twice in a row yields the same snapshot.
pub fn snapshot(step: u64, agents: &[Agent]) -> MetricsSnapshot {
    let encounters = || agents.iter().filter_map(Agent::encounter);

    let in_market = agents.iter().filter(|a| a.in_market()).count();
    let paired = encounters().count();
    let cooperating = agents
        .iter()
        .filter(|a| a.is_paired() && a.choice() == Choice::Cooperate)
        .count();
    let trust_sum: f64 = agents.iter().map(|a| a.propensities().trust).sum();

    MetricsSnapshot {
        step,
        market_share: ratio(in_market, agents.len()),
        play_rate: play_rate(encounters(), |_| true),
        cooperation_rate: ratio(cooperating, paired),
        trust_in_strangers: play_rate(encounters(), |e| e.partner_is_stranger),
        trust_in_neighbours: play_rate(encounters(), |e| e.venue == Venue::Neighbourhood),
        trust_in_newcomers: play_rate(encounters(), |e| e.partner_is_newcomer),
        mean_trust_propensity: if agents.is_empty() {
            0.0
        } else {
            trust_sum / agents.len() as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{AgentId, NeighbourhoodId};
    use crate::components::behaviour::{AgentKind, Behaviour};
    use crate::config::ModelConfig;
    use crate::SimRng;

    fn agents(n: usize) -> Vec<Agent> {
        let mut rng = SimRng::seed_from_u64(2);
        let config = ModelConfig::default();
        (0..n)
            .map(|i| {
                let behaviour = Behaviour::for_kind(AgentKind::NaiveTrust, &config);
                Agent::new(AgentId(i), NeighbourhoodId(0), behaviour, &mut rng)
            })
            .collect()
    }

    #[test]
    fn test_no_exchanges_reports_zero_rates() {
        let mut population = agents(4);
        for (agent, trust) in population.iter_mut().zip([0.1, 0.2, 0.3, 0.4]) {
            agent.propensities_mut().trust = trust;
        }
        let snap = snapshot(7, &population);

        assert_eq!(snap.step, 7);
        assert_eq!(snap.market_share, 0.0);
        assert_eq!(snap.play_rate, 0.0);
        assert_eq!(snap.cooperation_rate, 0.0);
        assert_eq!(snap.trust_in_strangers, 0.0);
        assert_eq!(snap.trust_in_neighbours, 0.0);
        assert_eq!(snap.trust_in_newcomers, 0.0);
        assert!((snap.mean_trust_propensity - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_rates_over_paired_agents() {
        let mut population = agents(3);
        let mut rng = SimRng::seed_from_u64(4);
        // Agent 0 trusts, agent 1 does not, agent 2 sits out
        population[0].propensities_mut().trust = 1.0;
        population[0].propensities_mut().cooperativeness = 1.0;
        population[1].propensities_mut().trust = 0.0;
        population[1].propensities_mut().cooperativeness = 0.0;

        for i in 0..2 {
            population[i].decide_cooperation(&mut rng);
        }
        let view1 = population[1].partner_view();
        let view0 = population[0].partner_view();
        population[0].decide_play(&view1, Venue::Neighbourhood, None, &mut rng);
        population[1].decide_play(&view0, Venue::Neighbourhood, None, &mut rng);

        let snap = snapshot(0, &population);
        assert_eq!(snap.play_rate, 0.5);
        assert_eq!(snap.cooperation_rate, 0.5);
        assert_eq!(snap.trust_in_neighbours, 0.5);
        // Neither side is a newcomer and the venue is local
        assert_eq!(snap.trust_in_strangers, 0.0);
        assert_eq!(snap.trust_in_newcomers, 0.0);

        assert_eq!(snapshot(0, &population), snap);
    }
}
