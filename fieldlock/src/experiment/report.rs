//! Experiment results and their console/JSON rendering

use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

/// Mean and sample standard deviation of batch times, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricStats {
    pub mean: f64,
    pub stddev: f64,
}

impl MetricStats {
    pub fn from_durations(samples: &[Duration]) -> Option<Self> {
        let count = u32::try_from(samples.len()).ok().filter(|&n| n > 0)?;
        let mean = duration_ms(samples.iter().sum::<Duration>() / count);

        let squares: f64 = samples
            .iter()
            .map(|d| (duration_ms(*d) - mean).powi(2))
            .sum();
        let stddev = match count {
            1 => 0.0,
            n => (squares / f64::from(n - 1)).sqrt(),
        };

        Some(Self { mean, stddev })
    }
}

/// Wall-clock timing of one (scenario, thread count) combination
#[derive(Debug, Clone, Serialize)]
pub struct LevelTiming {
    pub scenario: String,
    pub threads: usize,
    /// Elapsed milliseconds of every measured batch
    pub samples_ms: Vec<f64>,
    pub elapsed_ms: MetricStats,
    /// Operations dispatched across all runners and iterations
    pub operations: u64,
}

impl LevelTiming {
    pub fn new(
        scenario: impl Into<String>,
        threads: usize,
        samples: &[Duration],
        operations: u64,
    ) -> Self {
        let samples_ms = samples.iter().map(|d| duration_ms(*d)).collect();
        let elapsed_ms = MetricStats::from_durations(samples).unwrap_or_default();
        Self {
            scenario: scenario.into(),
            threads,
            samples_ms,
            elapsed_ms,
            operations,
        }
    }

    /// Console line for this level
    pub fn format_line(&self) -> String {
        let mut line = format!(
            "Mode: {} thread(s) | Total elapsed (max): {:.3} ms",
            self.threads, self.elapsed_ms.mean
        );
        if self.samples_ms.len() > 1 {
            let _ = write!(
                line,
                " ± {:.3} ms (n = {})",
                self.elapsed_ms.stddev,
                self.samples_ms.len()
            );
        }
        line
    }
}

/// Everything one driver run measured
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub generated_at: String,
    pub field_count: usize,
    pub iterations: usize,
    pub timings: Vec<LevelTiming>,
    /// Record contents once every scenario finished
    pub final_snapshot: String,
}

impl ExperimentReport {
    pub fn new(field_count: usize, iterations: usize) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            field_count,
            iterations,
            timings: Vec::new(),
            final_snapshot: String::new(),
        }
    }

    pub fn push(&mut self, timing: LevelTiming) {
        self.timings.push(timing);
    }

    pub fn timing(&self, scenario: &str, threads: usize) -> Option<&LevelTiming> {
        self.timings
            .iter()
            .find(|t| t.scenario == scenario && t.threads == threads)
    }

    /// Scenario names in the order they ran
    pub fn scenarios(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for timing in &self.timings {
            if names.last() != Some(&timing.scenario.as_str()) {
                names.push(&timing.scenario);
            }
        }
        names
    }

    /// Human-readable summary, one block per scenario
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "===== Elapsed time per scenario and thread count =====");
        for scenario in self.scenarios() {
            let _ = writeln!(out);
            let _ = writeln!(out, "--- Scenario: {} ---", scenario);
            for timing in self.timings.iter().filter(|t| t.scenario == scenario) {
                let _ = writeln!(out, "{}", timing.format_line());
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Final record: {}", self.final_snapshot);
        out
    }

    pub fn print_summary(&self) {
        print!("{}", self.render_summary());
    }

    /// JSON output for tooling
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ExperimentReport {
        let mut report = ExperimentReport::new(3, 1);
        report.push(LevelTiming::new("a", 1, &[Duration::from_millis(2)], 10));
        report.push(LevelTiming::new("a", 2, &[Duration::from_millis(3)], 20));
        report.push(LevelTiming::new("b", 1, &[Duration::from_micros(1500)], 10));
        report.final_snapshot = "[1, 1, 0]".to_string();
        report
    }

    #[test]
    fn test_metric_stats() {
        assert!(MetricStats::from_durations(&[]).is_none());

        let single = MetricStats::from_durations(&[Duration::from_micros(4_500)]).unwrap();
        assert_eq!(single.mean, 4.5);
        assert_eq!(single.stddev, 0.0);

        let stats = MetricStats::from_durations(&[
            Duration::from_millis(2),
            Duration::from_millis(4),
            Duration::from_millis(6),
        ])
        .unwrap();
        assert!((stats.mean - 4.0).abs() < 1e-9);
        assert!((stats.stddev - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_line_format() {
        let timing = LevelTiming::new("a", 2, &[Duration::from_micros(1250)], 0);
        assert_eq!(
            timing.format_line(),
            "Mode: 2 thread(s) | Total elapsed (max): 1.250 ms"
        );

        let repeated = LevelTiming::new(
            "a",
            3,
            &[Duration::from_millis(1), Duration::from_millis(3)],
            0,
        );
        assert!(repeated.format_line().ends_with("(n = 2)"));
    }

    #[test]
    fn test_report_groups_by_scenario() {
        let report = sample_report();
        assert_eq!(report.scenarios(), vec!["a", "b"]);
        assert_eq!(report.timing("a", 2).unwrap().operations, 20);
        assert!(report.timing("b", 2).is_none());

        let summary = report.render_summary();
        assert!(summary.contains("--- Scenario: a ---"));
        assert!(summary.contains("--- Scenario: b ---"));
        assert_eq!(summary.matches("Mode:").count(), 3);
        assert!(summary.contains("Final record: [1, 1, 0]"));
    }

    #[test]
    fn test_report_json() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["field_count"], 3);
        assert_eq!(value["timings"].as_array().unwrap().len(), 3);
        assert_eq!(value["timings"][1]["threads"], 2);
        assert_eq!(value["timings"][0]["elapsed_ms"]["mean"], 2.0);
        assert!(value["generated_at"].is_string());
    }
}
