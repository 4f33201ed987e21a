//! Contention Benchmarks for fieldlock
//!
//! Timing-sensitive checks that are too noisy for every CI run.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo test --test perf_tests --release -- --ignored --nocapture
//! ```

use fieldlock::experiment::{DriverConfig, ExperimentDriver, ScenarioWorkloads};
use fieldlock::workload::Scenario;
use fieldlock::{Operation, SharedRecord, WorkloadGenerator};
use std::time::Duration;

mod common;
use common::*;

/// Benchmark tier for different workload sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BenchmarkTier {
    /// Quick validation: 100K operations per runner
    Smoke,
    /// Matches the default binary run: 1M operations per runner
    Standard,
}

impl BenchmarkTier {
    fn name(&self) -> &'static str {
        match self {
            BenchmarkTier::Smoke => "SMOKE",
            BenchmarkTier::Standard => "STANDARD",
        }
    }

    fn ops_per_source(&self) -> usize {
        match self {
            BenchmarkTier::Smoke => 100_000,
            BenchmarkTier::Standard => 1_000_000,
        }
    }
}

/// Elapsed time of one batch where runner `i` writes only field `i`
fn distinct_field_writers(threads: usize, ops: usize) -> Duration {
    let driver = ExperimentDriver::new(SharedRecord::new(threads), DriverConfig::default());
    let workloads = (0..threads)
        .map(|index| repeat(Operation::Write { index, value: 1 }, ops))
        .collect::<Vec<_>>();
    driver.run_batch("distinct_fields", &workloads).unwrap().elapsed
}

/// Writers on distinct fields must not serialise behind one another
#[test]
#[ignore = "timing sensitive - run on an idle multi-core machine"]
fn bench_field_independence() {
    const OPS: usize = 2_000_000;

    // Warm-up
    distinct_field_writers(1, OPS / 10);

    let single = distinct_field_writers(1, OPS);
    let parallel = distinct_field_writers(3, OPS);
    println!("1 writer: {:?} | 3 writers on distinct fields: {:?}", single, parallel);

    // Fully serialised writers would need ~3x; leave headroom for scheduling noise
    assert!(
        parallel < single * 5 / 2,
        "distinct-field writers look serialised: {:?} vs {:?}",
        parallel,
        single
    );
}

/// Replay the built-in scenarios at tier size and print the report
fn run_benchmark(tier: BenchmarkTier) {
    println!("\nStarting {} benchmark...", tier.name());

    let generator = WorkloadGenerator::new(3, 1, 42);
    let prepared = ScenarioWorkloads::generate_all(
        &generator,
        &Scenario::builtin(),
        3,
        tier.ops_per_source(),
        None,
    )
    .expect("Built-in scenarios should generate");

    let driver = ExperimentDriver::new(
        SharedRecord::default(),
        DriverConfig {
            levels: vec![1, 2, 3],
            iterations: 3,
        },
    );
    let report = driver.run(&prepared).expect("Experiment should complete");

    report.print_summary();
    println!("JSON: {}", report.to_json().expect("Report should serialize"));

    assert_eq!(report.timings.len(), 9);
    assert!(report.timings.iter().all(|t| t.elapsed_ms.mean > 0.0));
}

#[test]
#[ignore = "long running benchmark"]
fn bench_smoke() {
    run_benchmark(BenchmarkTier::Smoke);
}

#[test]
#[ignore = "long running benchmark"]
fn bench_standard() {
    run_benchmark(BenchmarkTier::Standard);
}
