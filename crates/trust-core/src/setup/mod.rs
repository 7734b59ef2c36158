//! Model Setup
//!
//! Population spawning and initial placement.

pub mod population;

pub use population::*;
