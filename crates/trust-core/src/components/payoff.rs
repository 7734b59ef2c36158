//! Payoff Table
//!
//! The prisoners' dilemma payoffs, the exit payoff, and the opportunity cost
//! of cooperating within a small cell.

use serde::{Deserialize, Serialize};

use crate::components::agent::Choice;

/// Forgone outside options of exchanging in a set of `cell_size` agents out
/// of `population`: `1 - (k - 1) / (N - 1)`.
///
/// `population` must be at least 2; configuration validation guarantees it.
pub fn opportunity_cost(cell_size: usize, population: usize) -> f64 {
    let k = cell_size as f64;
    let n = population as f64;
    1.0 - (k - 1.0) / (n - 1.0)
}

/// Fixed payoffs keyed by (own choice, opponent choice).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffTable {
    /// Defect against a cooperator
    pub temptation: f64,
    /// Mutual cooperation
    pub reward: f64,
    /// Mutual defection
    pub punishment: f64,
    /// Cooperate against a defector
    pub sucker: f64,
    /// Payoff to both sides when either exits
    pub exit: f64,
    /// Share of the opportunity cost deducted when the opponent cooperated
    pub opportunity_weight: f64,
}

impl Default for PayoffTable {
    fn default() -> Self {
        Self {
            temptation: 1.0,
            reward: 0.7,
            punishment: -0.2,
            sucker: -0.5,
            exit: -0.2,
            opportunity_weight: 0.5,
        }
    }
}

impl PayoffTable {
    pub fn lookup(&self, own: Choice, other: Choice) -> f64 {
        match (own, other) {
            (Choice::Defect, Choice::Cooperate) => self.temptation,
            (Choice::Cooperate, Choice::Cooperate) => self.reward,
            (Choice::Defect, Choice::Defect) => self.punishment,
            (Choice::Cooperate, Choice::Defect) => self.sucker,
        }
    }

    /// Payoff of a completed exchange in which both sides played.
    pub fn exchange(&self, own: Choice, other: Choice, opportunity_cost: f64) -> f64 {
        let payoff = self.lookup(own, other);
        match other {
            Choice::Cooperate => payoff - self.opportunity_weight * opportunity_cost,
            Choice::Defect => payoff,
        }
    }

    /// Payoffs to both sides of a pair given their choices and play decisions.
    pub fn settle(
        &self,
        (a_choice, a_play): (Choice, bool),
        (b_choice, b_play): (Choice, bool),
        opportunity_cost: f64,
    ) -> (f64, f64) {
        if a_play && b_play {
            (
                self.exchange(a_choice, b_choice, opportunity_cost),
                self.exchange(b_choice, a_choice, opportunity_cost),
            )
        } else {
            (self.exit, self.exit)
        }
    }
}
