//! fieldlock library
//!
//! Measures how per-field locking and the operation mix affect the
//! throughput of a small shared record under concurrent access.

pub mod config;
pub mod experiment;
pub mod record;
pub mod workload;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use experiment::{DriverConfig, ExperimentDriver, ExperimentReport, ScenarioWorkloads};
pub use record::SharedRecord;
pub use workload::{Operation, Scenario, Workload, WorkloadGenerator};
