//! Experiment driver: concurrent batches of runners over one shared record
//!
//! For every scenario and every concurrency level `T`, the driver starts `T`
//! runner threads against the same record, joins them all, and records the
//! wall-clock span of the whole batch. The span is what the slowest runner
//! saw, which is the throughput of the batch as a whole.

use crate::experiment::report::{ExperimentReport, LevelTiming};
use crate::experiment::runner::{RunStats, WorkloadRunner};
use crate::experiment::types::{DriverError, ScenarioWorkloads};
use crate::record::SharedRecord;
use crate::workload::{OperationKind, Workload};
use metrics::{counter, histogram};
use std::any::Any;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Concurrency levels of the three-field experiment
pub const DEFAULT_LEVELS: [usize; 3] = [1, 2, 3];

/// Driver settings
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Thread counts to measure, in order
    pub levels: Vec<usize>,
    /// Measured batches per level
    pub iterations: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.to_vec(),
            iterations: 1,
        }
    }
}

/// Outcome of one concurrent batch
#[derive(Debug, Clone, Copy)]
pub struct BatchOutcome {
    pub elapsed: Duration,
    pub stats: RunStats,
}

/// Owns the shared record and replays scenarios against it
pub struct ExperimentDriver {
    record: SharedRecord,
    config: DriverConfig,
}

impl ExperimentDriver {
    pub fn new(record: SharedRecord, config: DriverConfig) -> Self {
        Self { record, config }
    }

    pub fn record(&self) -> &SharedRecord {
        &self.record
    }

    /// Run every scenario at every configured level
    ///
    /// The record is shared by all scenarios and levels and is never reset.
    pub fn run(&self, scenarios: &[ScenarioWorkloads]) -> Result<ExperimentReport, DriverError> {
        self.check(scenarios)?;

        let mut report = ExperimentReport::new(self.record.field_count(), self.config.iterations);

        for scenario in scenarios {
            info!("Scenario: {}", scenario.name);

            for &threads in &self.config.levels {
                let mut samples = Vec::with_capacity(self.config.iterations);
                let mut operations = 0;

                for iteration in 0..self.config.iterations {
                    let batch = self.time_batch(&scenario.name, &scenario.workloads[..threads])?;
                    debug!(
                        "{} / {} threads / iteration {}: {:?}",
                        scenario.name, threads, iteration, batch.elapsed
                    );
                    samples.push(batch.elapsed);
                    operations += batch.stats.dispatched();
                }

                let timing = LevelTiming::new(&scenario.name, threads, &samples, operations);
                info!(
                    "{}: {} thread(s) took {:.3} ms",
                    scenario.name, threads, timing.elapsed_ms.mean
                );
                report.push(timing);
            }
        }

        report.final_snapshot = self.record.snapshot();
        Ok(report)
    }

    /// Run one batch: one runner thread per workload, all joined before the clock stops
    ///
    /// Workloads naming a field the record does not have are rejected before
    /// any runner starts.
    pub fn run_batch(
        &self,
        scenario: &str,
        workloads: &[Workload],
    ) -> Result<BatchOutcome, DriverError> {
        if workloads.is_empty() {
            return Err(DriverError::InvalidLevel(0));
        }
        self.check_indices(scenario, workloads)?;
        self.time_batch(scenario, workloads)
    }

    fn time_batch(
        &self,
        scenario: &str,
        workloads: &[Workload],
    ) -> Result<BatchOutcome, DriverError> {
        let threads = workloads.len();

        let start = Instant::now();
        let (joined, spawn_error) = thread::scope(|s| {
            let mut handles = Vec::with_capacity(threads);
            let mut spawn_error = None;

            for (i, workload) in workloads.iter().enumerate() {
                let runner = WorkloadRunner::new(&self.record);
                let spawned = thread::Builder::new()
                    .name(format!("runner-{}", i))
                    .spawn_scoped(s, move || runner.run(workload));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        spawn_error = Some(DriverError::Spawn { runner: i, source });
                        break;
                    }
                }
            }

            let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
            (joined, spawn_error)
        });
        let elapsed = start.elapsed();

        if let Some(err) = spawn_error {
            return Err(err);
        }

        let mut stats = RunStats::default();
        for (runner, result) in joined.into_iter().enumerate() {
            match result {
                Ok(runner_stats) => stats += runner_stats,
                Err(payload) => {
                    return Err(DriverError::RunnerPanicked {
                        scenario: scenario.to_string(),
                        threads,
                        runner,
                        message: panic_message(payload.as_ref()),
                    });
                }
            }
        }

        record_batch_metrics(scenario, threads, elapsed, &stats);
        Ok(BatchOutcome { elapsed, stats })
    }

    /// Validate levels, workload counts and field indices before any thread starts
    fn check(&self, scenarios: &[ScenarioWorkloads]) -> Result<(), DriverError> {
        if self.config.iterations == 0 {
            return Err(DriverError::NoIterations);
        }
        if let Some(&level) = self.config.levels.iter().find(|&&level| level == 0) {
            return Err(DriverError::InvalidLevel(level));
        }

        let needed = self.config.levels.iter().copied().max().unwrap_or(0);
        for scenario in scenarios {
            if scenario.workloads.len() < needed {
                return Err(DriverError::MissingWorkloads {
                    scenario: scenario.name.clone(),
                    needed,
                    available: scenario.workloads.len(),
                });
            }
            self.check_indices(&scenario.name, &scenario.workloads[..needed])?;
        }
        Ok(())
    }

    fn check_indices(&self, scenario: &str, workloads: &[Workload]) -> Result<(), DriverError> {
        let field_count = self.record.field_count();
        for (runner, workload) in workloads.iter().enumerate() {
            if let Some(op) = workload.iter().find(|op| !op.fits(field_count)) {
                return Err(DriverError::IndexOutOfRange {
                    scenario: scenario.to_string(),
                    runner,
                    operation: op.to_string(),
                    field_count,
                });
            }
        }
        Ok(())
    }
}

fn record_batch_metrics(scenario: &str, threads: usize, elapsed: Duration, stats: &RunStats) {
    histogram!(
        "fieldlock_batch_elapsed_ms",
        "scenario" => scenario.to_string(),
        "threads" => threads.to_string()
    )
    .record(elapsed.as_secs_f64() * 1000.0);
    for kind in OperationKind::ALL {
        counter!("fieldlock_operations_total", "kind" => kind.name()).increment(stats.count(kind));
    }
    counter!("fieldlock_batches_total").increment(1);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
