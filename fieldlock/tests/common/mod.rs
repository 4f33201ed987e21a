//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use fieldlock::experiment::{DriverConfig, ExperimentDriver, ScenarioWorkloads};
use fieldlock::{Operation, SharedRecord, Workload};

/// A workload repeating one operation `count` times
pub fn repeat(op: Operation, count: usize) -> Workload {
    std::iter::repeat_n(op, count).collect()
}

/// A workload alternating writes of 0 and 1 to one field
pub fn toggling_writes(index: usize, count: usize) -> Workload {
    (0..count)
        .map(|i| Operation::Write {
            index,
            value: (i % 2) as i64,
        })
        .collect()
}

/// A scenario with `sources` copies of the same workload
pub fn uniform_scenario(name: &str, workload: Workload, sources: usize) -> ScenarioWorkloads {
    ScenarioWorkloads::new(name, vec![workload; sources])
}

/// Driver over a fresh three-field record
pub fn create_test_driver(levels: Vec<usize>) -> ExperimentDriver {
    ExperimentDriver::new(
        SharedRecord::default(),
        DriverConfig {
            levels,
            iterations: 1,
        },
    )
}
