//! Simulation Systems
//!
//! The per-tick phases: decide (move and market entry), pair and play, and
//! finalize (learning and market exit), plus the scheduler that drives them.

pub mod decide;
pub mod learning;
pub mod pairing;
pub mod scheduler;

// Re-export commonly used systems
pub use decide::{decide, destination};
pub use learning::finalize_agent;
pub use pairing::{pair_and_play, play_round, PairingSummary, RoundOutcome};
pub use scheduler::{Activation, TwoPhaseScheduler};
