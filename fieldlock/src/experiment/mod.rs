//! Contention experiment harness
//!
//! This module provides:
//! - `WorkloadRunner` replaying one workload source on one thread
//! - `ExperimentDriver` running concurrent batches and timing them
//! - `ExperimentReport` for console and JSON output

pub mod driver;
pub mod report;
pub mod runner;
mod types;

pub use driver::{BatchOutcome, DEFAULT_LEVELS, DriverConfig, ExperimentDriver};
pub use report::{ExperimentReport, LevelTiming, MetricStats};
pub use runner::{RunStats, WorkloadRunner};
pub use types::{DriverError, ScenarioWorkloads, workload_path};
