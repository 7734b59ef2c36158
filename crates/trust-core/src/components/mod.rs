//! Simulation Components
//!
//! Agent state, behaviour rules, reputation memory, the payoff table and the
//! neighbourhood/market partition.

pub mod agent;
pub mod behaviour;
pub mod memory;
pub mod partition;
pub mod payoff;

pub use agent::*;
pub use behaviour::*;
pub use memory::*;
pub use partition::*;
pub use payoff::*;
