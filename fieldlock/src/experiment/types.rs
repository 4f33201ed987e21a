//! Experiment-related types and error definitions

use crate::workload::{Scenario, Workload, WorkloadError, WorkloadGenerator};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while driving an experiment
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Concurrency level must be at least 1, got {0}")]
    InvalidLevel(usize),

    #[error("Iteration count must be at least 1")]
    NoIterations,

    #[error("Scenario {scenario:?} needs {needed} workloads but only has {available}")]
    MissingWorkloads {
        scenario: String,
        needed: usize,
        available: usize,
    },

    #[error("Runner {runner} of {scenario:?} has {operation:?} for a {field_count}-field record")]
    IndexOutOfRange {
        scenario: String,
        runner: usize,
        operation: String,
        field_count: usize,
    },

    #[error("Failed to spawn runner {runner}: {source}")]
    Spawn {
        runner: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Runner {runner} of scenario {scenario:?} ({threads} threads) panicked: {message}")]
    RunnerPanicked {
        scenario: String,
        threads: usize,
        runner: usize,
        message: String,
    },
}

/// A scenario's name together with the workload sources bound to its runners
///
/// Level `T` replays the first `T` sources, so a scenario needs at least as
/// many sources as the highest concurrency level.
#[derive(Debug, Clone)]
pub struct ScenarioWorkloads {
    pub name: String,
    pub workloads: Vec<Workload>,
}

impl ScenarioWorkloads {
    pub fn new(name: impl Into<String>, workloads: Vec<Workload>) -> Self {
        Self {
            name: name.into(),
            workloads,
        }
    }

    /// Generate `sources` workloads for every scenario, in order
    pub fn generate_all(
        generator: &WorkloadGenerator,
        scenarios: &[Scenario],
        sources: usize,
        ops: usize,
        dir: Option<&Path>,
    ) -> Result<Vec<Self>, WorkloadError> {
        scenarios
            .iter()
            .enumerate()
            .map(|(index, scenario)| Self::generate(generator, scenario, index, sources, ops, dir))
            .collect()
    }

    /// Generate `sources` workloads of `ops` operations for the
    /// `scenario_index`-th scenario of a run
    ///
    /// With a `dir`, every workload is written to `<scenario>_<n>.txt` (n
    /// counting from 1) and read back, so the runners replay exactly what the
    /// files contain.
    pub fn generate(
        generator: &WorkloadGenerator,
        scenario: &Scenario,
        scenario_index: usize,
        sources: usize,
        ops: usize,
        dir: Option<&Path>,
    ) -> Result<Self, WorkloadError> {
        let mut workloads = Vec::with_capacity(sources);
        for slot in 0..sources {
            let workload = generator.generate(scenario, scenario_index, slot, ops)?;
            let workload = match dir {
                Some(dir) => {
                    let path = workload_path(dir, &scenario.name, slot);
                    workload.save(&path)?;
                    Workload::load_for(&path, generator.field_count())?
                }
                None => workload,
            };
            workloads.push(workload);
        }

        if let Some(dir) = dir {
            info!(
                "Wrote {} workload files for {} to {}",
                sources,
                scenario.name,
                dir.display()
            );
        }
        Ok(Self::new(scenario.name.clone(), workloads))
    }
}

/// File holding workload `slot` (zero-based) of a scenario
pub fn workload_path(dir: &Path, scenario: &str, slot: usize) -> PathBuf {
    dir.join(format!("{}_{}.txt", scenario, slot + 1))
}
