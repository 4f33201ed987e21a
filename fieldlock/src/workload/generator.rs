//! Workload generation from scenario distributions
//!
//! A scenario holds `2 * fields + 1` weights laid out positionally as
//! `[read 0, write 0, read 1, write 1, ..., snapshot]`. The generator draws
//! operations from the normalised distribution with a seeded ChaCha stream,
//! so a base seed reproduces every workload of a run. Each scenario gets its
//! own seed derived from its position; each source slot its own stream.

use crate::workload::types::{Operation, Workload, WorkloadError};
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Named categorical distribution over operation kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub weights: Vec<f64>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, weights: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    /// The three scenarios of the three-field experiment
    pub fn builtin() -> Vec<Scenario> {
        vec![
            Scenario::new("a_condition", vec![10.0, 5.0, 10.0, 5.0, 10.0, 20.0, 40.0]),
            Scenario::new("b_equal", vec![1.0; 7]),
            Scenario::new("c_mismatch", vec![40.0, 1.0, 2.0, 30.0, 1.0, 5.0, 21.0]),
        ]
    }

    /// Load a scenario list from a JSON file: `[{"name": ..., "weights": [...]}]`
    pub fn load_list(path: &Path) -> Result<Vec<Scenario>, WorkloadError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| WorkloadError::FileError {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Number of weights a scenario needs for a record of `field_count` fields
    pub fn weight_count(field_count: usize) -> usize {
        2 * field_count + 1
    }

    /// Check that the weights describe a usable distribution
    pub fn validate(&self, field_count: usize) -> Result<(), WorkloadError> {
        let expected = Self::weight_count(field_count);
        if self.weights.len() != expected {
            return Err(WorkloadError::WeightCount {
                scenario: self.name.clone(),
                fields: field_count,
                expected,
                actual: self.weights.len(),
            });
        }
        if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(WorkloadError::InvalidWeights {
                scenario: self.name.clone(),
                reason: format!("weight {} is negative or not finite", w),
            });
        }
        if self.weights.iter().all(|w| *w == 0.0) {
            return Err(WorkloadError::InvalidWeights {
                scenario: self.name.clone(),
                reason: "all weights are zero".to_string(),
            });
        }
        Ok(())
    }

    /// Map a category index of the distribution back to an operation
    fn operation(category: usize, field_count: usize, write_value: i64) -> Operation {
        if category == 2 * field_count {
            Operation::Snapshot
        } else if category % 2 == 0 {
            Operation::Read {
                index: category / 2,
            }
        } else {
            Operation::Write {
                index: category / 2,
                value: write_value,
            }
        }
    }
}

/// Seeded generator of workloads for a record of a fixed field count
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    field_count: usize,
    write_value: i64,
    seed: u64,
}

impl WorkloadGenerator {
    pub fn new(field_count: usize, write_value: i64, seed: u64) -> Self {
        Self {
            field_count,
            write_value,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Generate `ops` operations for `scenario`, the `scenario_index`-th of the run
    ///
    /// `slot` selects an independent stream, so every runner of a scenario
    /// gets its own sequence while the whole run stays reproducible.
    pub fn generate(
        &self,
        scenario: &Scenario,
        scenario_index: usize,
        slot: usize,
        ops: usize,
    ) -> Result<Workload, WorkloadError> {
        scenario.validate(self.field_count)?;
        let dist =
            WeightedIndex::new(&scenario.weights).map_err(|e| WorkloadError::InvalidWeights {
                scenario: scenario.name.clone(),
                reason: e.to_string(),
            })?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ scenario_index as u64);
        rng.set_stream(slot as u64);

        let workload: Workload = (0..ops)
            .map(|_| {
                Scenario::operation(dist.sample(&mut rng), self.field_count, self.write_value)
            })
            .collect();

        debug!(
            "Generated workload for {} slot {}: {} operations",
            scenario.name, slot, ops
        );
        Ok(workload)
    }
}
