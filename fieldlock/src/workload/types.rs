//! Workload-related types and error definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when building, reading or writing workloads
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read workload file {path:?}: {source}")]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scenario {scenario:?} has {actual} weights, expected {expected} for {fields} fields")]
    WeightCount {
        scenario: String,
        fields: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Scenario {scenario:?} has invalid weights: {reason}")]
    InvalidWeights { scenario: String, reason: String },

    #[error("Failed to parse scenario list: {0}")]
    ScenarioParse(#[from] serde_json::Error),
}

/// One operation against the shared record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Read { index: usize },
    Write { index: usize, value: i64 },
    Snapshot,
}

impl Operation {
    /// Operation kind, used for dispatch counts and their metric labels
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Read { .. } => OperationKind::Read,
            Operation::Write { .. } => OperationKind::Write,
            Operation::Snapshot => OperationKind::Snapshot,
        }
    }

    /// Field index touched by a single-field operation
    pub fn index(&self) -> Option<usize> {
        match *self {
            Operation::Read { index } | Operation::Write { index, .. } => Some(index),
            Operation::Snapshot => None,
        }
    }

    /// Whether the operation can be applied to a record of `field_count` fields
    pub fn fits(&self, field_count: usize) -> bool {
        self.index().is_none_or(|index| index < field_count)
    }
}

/// Renders the workload text form (`read 0`, `write 0 1`, `string`)
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read { index } => write!(f, "read {}", index),
            Operation::Write { index, value } => write!(f, "write {} {}", index, value),
            Operation::Snapshot => f.write_str("string"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Read,
    Write,
    Snapshot,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Read,
        OperationKind::Write,
        OperationKind::Snapshot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Read => "read",
            OperationKind::Write => "write",
            OperationKind::Snapshot => "snapshot",
        }
    }
}

/// An owned, finite sequence of operations replayed by exactly one runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    ops: Vec<Operation>,
    /// Lines dropped by the permissive text reader
    skipped: usize,
}

impl Workload {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops, skipped: 0 }
    }

    pub(crate) fn with_skipped(ops: Vec<Operation>, skipped: usize) -> Self {
        Self { ops, skipped }
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of unrecognised lines skipped while parsing
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Operation>> {
        self.ops.iter().copied()
    }
}

impl From<Vec<Operation>> for Workload {
    fn from(ops: Vec<Operation>) -> Self {
        Self::new(ops)
    }
}

impl FromIterator<Operation> for Workload {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Workload {
    type Item = Operation;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Operation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Workload {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
