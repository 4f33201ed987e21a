//! Test Utilities Module
//!
//! Provides helper functions and fixtures for testing the harness.
//! This module is only compiled when running tests.

#![cfg(test)]

use crate::experiment::ScenarioWorkloads;
use crate::workload::{Operation, Workload};

// ============================================================================
// Workload Fixtures
// ============================================================================

/// A workload repeating one operation `count` times
pub fn repeat_workload(op: Operation, count: usize) -> Workload {
    std::iter::repeat_n(op, count).collect()
}

/// A scenario with `sources` identical workloads of `ops` operations each
pub fn scenario_of(name: &str, op: Operation, sources: usize, ops: usize) -> ScenarioWorkloads {
    ScenarioWorkloads::new(
        name,
        (0..sources).map(|_| repeat_workload(op, ops)).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_workload() {
        let workload = repeat_workload(Operation::Snapshot, 4);
        assert_eq!(workload.len(), 4);
        assert!(workload.iter().all(|op| op == Operation::Snapshot));
    }

    #[test]
    fn test_scenario_of() {
        let scenario = scenario_of("s", Operation::Read { index: 1 }, 3, 2);
        assert_eq!(scenario.name, "s");
        assert_eq!(scenario.workloads.len(), 3);
        assert!(scenario.workloads.iter().all(|w| w.len() == 2));
    }
}
