//! Harness configuration
//!
//! Configuration is loaded from environment variables prefixed with
//! `FIELDLOCK_`. Unset or unparseable values keep their defaults.

use crate::record::DEFAULT_FIELD_COUNT;
use std::env;
use std::path::PathBuf;

/// Main harness configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Shared record configuration
    pub record: RecordConfig,

    /// Workload generation configuration
    pub workload: WorkloadConfig,

    /// Experiment driver configuration
    pub experiment: ExperimentConfig,

    /// Report output configuration
    pub report: ReportConfig,
}

/// Shared record configuration
#[derive(Debug, Clone)]
pub struct RecordConfig {
    /// Number of independently guarded fields
    pub fields: usize,
}

/// Workload generation configuration
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Operations per workload source
    pub ops_per_source: usize,
    /// Value written by generated write operations
    pub write_value: i64,
    /// Base seed; a random one is drawn when unset
    pub seed: Option<u64>,
    /// Directory the workload files are written to and read back from
    pub dir: Option<PathBuf>,
    /// JSON scenario list replacing the built-in scenarios
    pub scenarios_path: Option<PathBuf>,
}

/// Experiment driver configuration
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Highest concurrency level; levels run from 1 up to this
    pub max_threads: usize,
    /// Measured batches per level
    pub iterations: usize,
}

/// Report output configuration
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Print the JSON report after the summary
    pub json: bool,
    /// Print collected metrics in Prometheus text format
    pub prometheus: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELD_COUNT,
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            ops_per_source: 1_000_000,
            write_value: 1,
            seed: None,
            dir: None,
            scenarios_path: None,
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            max_threads: 3,
            iterations: 1,
        }
    }
}

impl ExperimentConfig {
    /// Concurrency levels to measure
    pub fn levels(&self) -> Vec<usize> {
        (1..=self.max_threads).collect()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Record config
        if let Some(val) = lookup("FIELDLOCK_FIELDS")
            && let Ok(v) = val.parse::<usize>()
            && v > 0
        {
            config.record.fields = v;
        }

        // Workload config
        if let Some(val) = lookup("FIELDLOCK_OPS")
            && let Ok(v) = val.parse()
        {
            config.workload.ops_per_source = v;
        }
        if let Some(val) = lookup("FIELDLOCK_WRITE_VALUE")
            && let Ok(v) = val.parse()
        {
            config.workload.write_value = v;
        }
        if let Some(val) = lookup("FIELDLOCK_SEED")
            && let Ok(v) = val.parse()
        {
            config.workload.seed = Some(v);
        }
        if let Some(path) = lookup("FIELDLOCK_WORKLOAD_DIR")
            && !path.is_empty()
        {
            config.workload.dir = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("FIELDLOCK_SCENARIOS")
            && !path.is_empty()
        {
            config.workload.scenarios_path = Some(PathBuf::from(path));
        }

        // Experiment config
        if let Some(val) = lookup("FIELDLOCK_MAX_THREADS")
            && let Ok(v) = val.parse::<usize>()
            && v > 0
        {
            config.experiment.max_threads = v;
        }
        if let Some(val) = lookup("FIELDLOCK_ITERATIONS")
            && let Ok(v) = val.parse::<usize>()
            && v > 0
        {
            config.experiment.iterations = v;
        }

        // Report config
        if let Some(val) = lookup("FIELDLOCK_JSON") {
            config.report.json = parse_flag(&val);
        }
        if let Some(val) = lookup("FIELDLOCK_PROMETHEUS") {
            config.report.prometheus = parse_flag(&val);
        }

        config
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}
