//! Agent Components
//!
//! Per-agent state: location, propensities, this tick's encounter, and the
//! decide/learn logic shared by every behavioural variant.

use serde::{Deserialize, Serialize};

use crate::components::behaviour::{AgentKind, Behaviour, PlayRule, Standing};
use crate::SimRng;

/// Stable agent identifier; also the agent's index in the model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl AgentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a neighbourhood in the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NeighbourhoodId(pub usize);

impl NeighbourhoodId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Choice in the prisoners' dilemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Cooperate,
    Defect,
}

impl Choice {
    pub fn opposite(self) -> Self {
        match self {
            Choice::Cooperate => Choice::Defect,
            Choice::Defect => Choice::Cooperate,
        }
    }
}

/// Where an exchange takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    Neighbourhood,
    Market,
}

/// The three propensities of an agent, each a probability in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propensities {
    /// Propensity to play (naive trust) or to read signals over acting parochially
    pub trust: f64,
    /// Propensity to cooperate over defecting
    pub cooperativeness: f64,
    /// Propensity to enter the market over staying in the neighbourhood
    pub market: f64,
}

impl Propensities {
    /// Draws all three propensities uniformly, in the order trust,
    /// cooperativeness, market.
    pub fn draw(rng: &mut SimRng) -> Self {
        let trust = rng.unit();
        let cooperativeness = rng.unit();
        let market = rng.unit();
        Self {
            trust,
            cooperativeness,
            market,
        }
    }

    pub fn get(&self, propensity: Propensity) -> f64 {
        match propensity {
            Propensity::Trust => self.trust,
            Propensity::Cooperativeness => self.cooperativeness,
            Propensity::Market => self.market,
        }
    }

    pub fn set(&mut self, propensity: Propensity, value: f64) {
        match propensity {
            Propensity::Trust => self.trust = value,
            Propensity::Cooperativeness => self.cooperativeness = value,
            Propensity::Market => self.market = value,
        }
    }
}

/// Selects one of the three propensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Propensity {
    Trust,
    Cooperativeness,
    Market,
}

/// How this tick's play/exit decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayBasis {
    /// Bernoulli draw against the trust propensity
    Propensity,
    /// Read the opponent's signal
    Signal,
    /// Played iff the opponent is a known neighbour
    Parochial,
    /// Own memory of the opponent
    Memory,
    /// The role model's memory of the opponent
    Advice,
}

/// What an agent can observe about its matched opponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartnerView {
    pub id: AgentId,
    pub newcomer: bool,
    pub choice: Choice,
    pub cooperativeness: f64,
}

impl PartnerView {
    /// The opponent's choice as perceived by a signal reader.
    ///
    /// Correct with probability `0.5 + |cooperativeness - 0.5|`: perfect at
    /// the extremes, a coin flip at 0.5.
    pub fn signal(&self, rng: &mut SimRng) -> Choice {
        let correctness = 0.5 + (self.cooperativeness - 0.5).abs();
        if rng.chance(correctness) {
            self.choice
        } else {
            self.choice.opposite()
        }
    }
}

/// The exchange an agent took part in this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encounter {
    pub partner: AgentId,
    pub venue: Venue,
    /// Either side is a newcomer, or the pairing happened in the market
    pub partner_is_stranger: bool,
    /// Either side is a newcomer and the pairing happened in a neighbourhood
    pub partner_is_newcomer: bool,
    pub basis: PlayBasis,
    pub play: bool,
    pub partner_played: bool,
    pub payoff: f64,
}

/// A simulated agent.
#[derive(Debug)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) neighbourhood: NeighbourhoodId,
    pub(crate) newcomer: bool,
    pub(crate) in_market: bool,
    pub(crate) propensities: Propensities,
    pub(crate) choice: Choice,
    pub(crate) encounter: Option<Encounter>,
    pub(crate) behaviour: Behaviour,
    pub(crate) standing: Standing,
}

impl Agent {
    /// Creates an agent in `neighbourhood` with freshly drawn propensities.
    pub fn new(
        id: AgentId,
        neighbourhood: NeighbourhoodId,
        behaviour: Behaviour,
        rng: &mut SimRng,
    ) -> Self {
        let standing = behaviour.new_standing();
        Self {
            id,
            neighbourhood,
            newcomer: false,
            in_market: false,
            propensities: Propensities::draw(rng),
            choice: Choice::Cooperate,
            encounter: None,
            behaviour,
            standing,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn kind(&self) -> AgentKind {
        self.behaviour.kind
    }

    pub fn neighbourhood(&self) -> NeighbourhoodId {
        self.neighbourhood
    }

    pub fn is_newcomer(&self) -> bool {
        self.newcomer
    }

    pub fn in_market(&self) -> bool {
        self.in_market
    }

    pub fn propensities(&self) -> Propensities {
        self.propensities
    }

    /// Mutable access for scenario set-up and tests.
    pub fn propensities_mut(&mut self) -> &mut Propensities {
        &mut self.propensities
    }

    pub fn choice(&self) -> Choice {
        self.choice
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    pub fn is_paired(&self) -> bool {
        self.encounter.is_some()
    }

    /// Accumulated payoff used to elect role models.
    pub fn standing(&self) -> f64 {
        self.standing.value()
    }

    pub fn behaviour(&self) -> &Behaviour {
        &self.behaviour
    }

    pub fn behaviour_mut(&mut self) -> &mut Behaviour {
        &mut self.behaviour
    }

    /// The role model's view of its memory about `partner`, without
    /// refreshing recency.
    pub fn recollection_of(&self, partner: AgentId) -> Option<bool> {
        self.behaviour.memory.as_ref().and_then(|m| m.peek(partner))
    }

    pub(crate) fn partner_view(&self) -> PartnerView {
        PartnerView {
            id: self.id,
            newcomer: self.newcomer,
            choice: self.choice,
            cooperativeness: self.propensities.cooperativeness,
        }
    }

    /// Marks the agent as having arrived in `to` this tick. Standing earned
    /// elsewhere does not carry over.
    pub(crate) fn relocate(&mut self, to: NeighbourhoodId) {
        self.neighbourhood = to;
        self.newcomer = true;
        self.standing.reset();
    }

    pub(crate) fn stay(&mut self) {
        self.newcomer = false;
    }

    /// Bernoulli draw against the cooperativeness propensity.
    pub fn decide_cooperation(&mut self, rng: &mut SimRng) -> Choice {
        self.choice = if rng.chance(self.propensities.cooperativeness) {
            Choice::Cooperate
        } else {
            Choice::Defect
        };
        self.choice
    }

    /// Decides whether to play against `partner` or exit, and opens this
    /// tick's encounter.
    ///
    /// Reputation agents first consult their own memory, then `advice` (the
    /// role model's memory of the partner); only without either do they fall
    /// back to their play rule.
    pub fn decide_play(
        &mut self,
        partner: &PartnerView,
        venue: Venue,
        advice: Option<bool>,
        rng: &mut SimRng,
    ) -> bool {
        let partner_is_stranger = self.newcomer || partner.newcomer || venue == Venue::Market;
        let partner_is_newcomer =
            venue == Venue::Neighbourhood && (self.newcomer || partner.newcomer);

        let remembered = self
            .behaviour
            .memory
            .as_mut()
            .and_then(|memory| memory.recall(partner.id));
        let advice = advice.filter(|_| self.behaviour.memory.is_some());

        let (basis, play) = match (remembered, advice) {
            (Some(trusted), _) => (PlayBasis::Memory, trusted),
            (None, Some(trusted)) => (PlayBasis::Advice, trusted),
            (None, None) => match self.behaviour.play_rule {
                PlayRule::Naive => (PlayBasis::Propensity, rng.chance(self.propensities.trust)),
                PlayRule::SignalParochial => {
                    if rng.chance(self.propensities.trust) {
                        (PlayBasis::Signal, partner.signal(rng) == Choice::Cooperate)
                    } else {
                        (PlayBasis::Parochial, !partner_is_stranger)
                    }
                }
            },
        };

        self.encounter = Some(Encounter {
            partner: partner.id,
            venue,
            partner_is_stranger,
            partner_is_newcomer,
            basis,
            play,
            partner_played: false,
            payoff: 0.0,
        });
        play
    }

    /// Delivers this tick's payoff. Ignored for an agent that was not paired.
    pub fn receive_payoff(&mut self, payoff: f64, partner_played: bool) {
        let Some(encounter) = self.encounter.as_mut() else {
            return;
        };
        encounter.payoff = payoff;
        encounter.partner_played = partner_played;
        self.standing.record(payoff);
        self.behaviour.learning.observe(payoff);
    }

    /// Finalize phase: memorise the exchange, update propensities, and close
    /// the encounter. Unpaired agents are left untouched.
    ///
    /// `role_model` is the current role model's propensities, or `None` when
    /// the neighbourhood has none or the agent is its own role model.
    pub fn finalize(&mut self, role_model: Option<Propensities>, rng: &mut SimRng) {
        let Some(encounter) = self.encounter.take() else {
            return;
        };

        if encounter.play && encounter.partner_played {
            if let Some(memory) = self.behaviour.memory.as_mut() {
                memory.remember(encounter.partner, encounter.payoff > 0.0);
            }
        }

        self.update_behaviour(&encounter, role_model, rng);
    }

    fn update_behaviour(
        &mut self,
        encounter: &Encounter,
        role_model: Option<Propensities>,
        rng: &mut SimRng,
    ) {
        let payoff = encounter.payoff;
        self.update_propensity(Propensity::Market, self.in_market, payoff, role_model, rng);
        self.update_propensity(
            Propensity::Cooperativeness,
            self.choice == Choice::Cooperate,
            payoff,
            role_model,
            rng,
        );

        // Decisions taken from memory or advice exercised neither branch
        let trust_branch = match encounter.basis {
            PlayBasis::Propensity => Some(encounter.play),
            PlayBasis::Signal => Some(true),
            PlayBasis::Parochial => Some(false),
            PlayBasis::Memory | PlayBasis::Advice => None,
        };
        if let Some(taken) = trust_branch {
            self.update_propensity(Propensity::Trust, taken, payoff, role_model, rng);
        }
    }

    /// Either imitates the role model or reinforces the branch that was
    /// taken: `taken` reinforces `p`, otherwise `1 - p` is reinforced.
    fn update_propensity(
        &mut self,
        propensity: Propensity,
        taken: bool,
        payoff: f64,
        role_model: Option<Propensities>,
        rng: &mut SimRng,
    ) {
        let current = self.propensities.get(propensity);
        let next = match role_model {
            Some(model) if rng.chance(self.behaviour.social_learning_rate) => {
                model.get(propensity)
            }
            _ if taken => self.behaviour.learning.reinforce(current, payoff),
            _ => 1.0 - self.behaviour.learning.reinforce(1.0 - current, payoff),
        };
        self.propensities.set(propensity, next.clamp(0.0, 1.0));
    }
}
