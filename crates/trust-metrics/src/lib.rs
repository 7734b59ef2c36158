//! Shared metric types and serialization for the trust simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine fills them once per recorded step; reporting tools and the
//! sweep driver summarise them.

pub mod series;
pub mod snapshot;

// Re-export snapshot types
pub use snapshot::{Metric, MetricsSnapshot, ParseMetricError};

// Re-export series types
pub use series::{MetricSummary, MetricsSeries, SeriesSummary};
