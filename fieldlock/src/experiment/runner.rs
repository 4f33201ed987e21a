//! Replays one workload source against the shared record

use crate::record::SharedRecord;
use crate::workload::{Operation, OperationKind};
use serde::Serialize;
use std::hint::black_box;
use std::ops::AddAssign;

/// Count of operations a runner dispatched, by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub reads: u64,
    pub writes: u64,
    pub snapshots: u64,
}

impl RunStats {
    /// Total number of dispatched operations
    pub fn dispatched(&self) -> u64 {
        self.reads + self.writes + self.snapshots
    }

    pub fn count(&self, kind: OperationKind) -> u64 {
        match kind {
            OperationKind::Read => self.reads,
            OperationKind::Write => self.writes,
            OperationKind::Snapshot => self.snapshots,
        }
    }

    fn record(&mut self, kind: OperationKind) {
        match kind {
            OperationKind::Read => self.reads += 1,
            OperationKind::Write => self.writes += 1,
            OperationKind::Snapshot => self.snapshots += 1,
        }
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, other: Self) {
        self.reads += other.reads;
        self.writes += other.writes;
        self.snapshots += other.snapshots;
    }
}

/// One thread's replay of one workload source
///
/// Results of reads and snapshots are discarded: the harness only measures
/// how long the replay takes under contention.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadRunner<'a> {
    record: &'a SharedRecord,
}

impl<'a> WorkloadRunner<'a> {
    pub fn new(record: &'a SharedRecord) -> Self {
        Self { record }
    }

    /// Consume `source` front to back, dispatching every operation in order
    pub fn run<I>(&self, source: I) -> RunStats
    where
        I: IntoIterator<Item = Operation>,
    {
        let mut stats = RunStats::default();
        for op in source {
            self.dispatch(op);
            stats.record(op.kind());
        }
        stats
    }

    /// Apply a single operation to the record
    pub fn dispatch(&self, op: Operation) {
        match op {
            Operation::Read { index } => {
                black_box(self.record.read(index));
            }
            Operation::Write { index, value } => self.record.write(index, value),
            Operation::Snapshot => {
                black_box(self.record.snapshot());
            }
        }
    }
}
