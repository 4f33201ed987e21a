//! Shared record with one guard per field
//!
//! Every field owns its own mutex, so single-field reads and writes only ever
//! contend with accesses to the same field. Operations that need the whole
//! record (`snapshot`, `lock_all`) take every guard in ascending index order;
//! all multi-guard acquirers share that order, so they cannot deadlock.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;

/// Field count of the standard three-field record
pub const DEFAULT_FIELD_COUNT: usize = 3;

/// Fixed-arity record of integer fields, each behind its own guard
#[derive(Debug)]
pub struct SharedRecord {
    fields: Box<[Mutex<i64>]>,
}

impl Default for SharedRecord {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_COUNT)
    }
}

impl SharedRecord {
    /// Create a record with `field_count` zeroed fields
    ///
    /// # Panics
    ///
    /// Panics if `field_count` is zero.
    pub fn new(field_count: usize) -> Self {
        assert!(field_count > 0, "a shared record needs at least one field");
        Self {
            fields: (0..field_count).map(|_| Mutex::new(0)).collect(),
        }
    }

    /// Create a record from initial values
    pub fn from_values(values: &[i64]) -> Self {
        assert!(!values.is_empty(), "a shared record needs at least one field");
        Self {
            fields: values.iter().copied().map(Mutex::new).collect(),
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Read one field, holding only that field's guard
    ///
    /// # Panics
    ///
    /// Panics if `index >= field_count()`.
    pub fn read(&self, index: usize) -> i64 {
        *self.field(index).lock()
    }

    /// Overwrite one field, holding only that field's guard
    ///
    /// # Panics
    ///
    /// Panics if `index >= field_count()`.
    pub fn write(&self, index: usize, value: i64) {
        *self.field(index).lock() = value;
    }

    /// Render a consistent view of every field as `"[v0, v1, v2]"`
    pub fn snapshot(&self) -> String {
        self.lock_all().to_string()
    }

    /// Consistent view of every field as raw values
    pub fn snapshot_values(&self) -> Vec<i64> {
        self.lock_all().values()
    }

    /// Acquire every field guard in ascending index order
    ///
    /// The returned guard holds all fields until dropped, so reads and writes
    /// through it form one atomic step with respect to every other accessor.
    pub fn lock_all(&self) -> RecordGuard<'_> {
        RecordGuard {
            guards: self.fields.iter().map(|field| field.lock()).collect(),
        }
    }

    fn field(&self, index: usize) -> &Mutex<i64> {
        match self.fields.get(index) {
            Some(field) => field,
            None => panic!(
                "field index out of bounds: the record has {} fields but the index is {}",
                self.fields.len(),
                index
            ),
        }
    }
}

/// Every field guard of a [`SharedRecord`], held together
pub struct RecordGuard<'a> {
    guards: Vec<MutexGuard<'a, i64>>,
}

impl RecordGuard<'_> {
    pub fn get(&self, index: usize) -> i64 {
        *self.guards[index]
    }

    pub fn set(&mut self, index: usize, value: i64) {
        *self.guards[index] = value;
    }

    /// Set every field to the same value
    pub fn fill(&mut self, value: i64) {
        for guard in &mut self.guards {
            **guard = value;
        }
    }

    pub fn values(&self) -> Vec<i64> {
        self.guards.iter().map(|guard| **guard).collect()
    }
}

impl fmt::Display for RecordGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, guard) in self.guards.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", **guard)?;
        }
        f.write_str("]")
    }
}
