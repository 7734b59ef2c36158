//! Simulation Output
//!
//! Per-tick metric computation and run reports.

pub mod metrics;
pub mod stats;

pub use metrics::snapshot;
pub use stats::{write_report, RunReport};
