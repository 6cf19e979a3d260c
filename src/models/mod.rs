//! Serializable snapshots of cache state
//!
//! DTOs a host can export through whatever channel it owns.

pub mod report;

pub use report::{EntryReport, MetricsReport};
