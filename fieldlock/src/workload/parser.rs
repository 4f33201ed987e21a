//! Text codec for workload files
//!
//! One operation per line, whitespace-separated tokens:
//!
//! ```text
//! read <index>
//! write <index> <value>
//! string
//! ```
//!
//! Parsing is permissive: any line that is not exactly one of these forms is
//! skipped, never reported as an error. The `*_for` readers also skip lines
//! whose index does not name a field of the target record.

use crate::workload::types::{Operation, Workload, WorkloadError};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// A line that does not spell out any known operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized workload line: {0:?}")]
pub struct UnrecognizedLine(pub String);

/// Parse one workload line, returning `None` for anything unrecognised
pub fn parse_line(line: &str) -> Option<Operation> {
    let mut tokens = line.split_whitespace();
    let op = match tokens.next()? {
        "read" => Operation::Read {
            index: tokens.next()?.parse().ok()?,
        },
        "write" => Operation::Write {
            index: tokens.next()?.parse().ok()?,
            value: tokens.next()?.parse().ok()?,
        },
        "string" => Operation::Snapshot,
        _ => return None,
    };

    // Trailing tokens make the line ambiguous, so it is dropped as well
    if tokens.next().is_some() {
        return None;
    }
    Some(op)
}

/// Parse one workload line for a record of `field_count` fields
///
/// Lines naming a field outside the record are treated like any other
/// unrecognised line.
pub fn parse_line_for(line: &str, field_count: usize) -> Option<Operation> {
    parse_line(line).filter(|op| op.fits(field_count))
}

impl FromStr for Operation {
    type Err = UnrecognizedLine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s).ok_or_else(|| UnrecognizedLine(s.to_string()))
    }
}

/// Streaming reader yielding operations and silently skipping bad lines
pub struct WorkloadReader<R> {
    lines: std::io::Lines<R>,
    field_count: Option<usize>,
    skipped: usize,
}

impl<R: BufRead> WorkloadReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            field_count: None,
            skipped: 0,
        }
    }

    /// Also skip lines whose index is `>= field_count`
    pub fn with_field_count(mut self, field_count: usize) -> Self {
        self.field_count = Some(field_count);
        self
    }

    /// Lines skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for WorkloadReader<R> {
    type Item = std::io::Result<Operation>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            match parse_line_bounded(&line, self.field_count) {
                Some(op) => return Some(Ok(op)),
                None => {
                    trace!("Skipping workload line: {:?}", line);
                    self.skipped += 1;
                }
            }
        }
    }
}

fn parse_line_bounded(line: &str, field_count: Option<usize>) -> Option<Operation> {
    match field_count {
        Some(field_count) => parse_line_for(line, field_count),
        None => parse_line(line),
    }
}

impl Workload {
    /// Parse a whole workload held in memory
    pub fn parse(text: &str) -> Self {
        Self::parse_text(text, None)
    }

    /// Parse a workload for a record of `field_count` fields
    pub fn parse_for(text: &str, field_count: usize) -> Self {
        Self::parse_text(text, Some(field_count))
    }

    fn parse_text(text: &str, field_count: Option<usize>) -> Self {
        let mut skipped = 0;
        let ops = text
            .lines()
            .filter_map(|line| {
                let op = parse_line_bounded(line, field_count);
                if op.is_none() {
                    skipped += 1;
                }
                op
            })
            .collect();
        Workload::with_skipped(ops, skipped)
    }

    /// Read a workload from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, WorkloadError> {
        Self::collect_reader(WorkloadReader::new(reader))
    }

    /// Read a workload for a record of `field_count` fields
    pub fn from_reader_for<R: BufRead>(
        reader: R,
        field_count: usize,
    ) -> Result<Self, WorkloadError> {
        Self::collect_reader(WorkloadReader::new(reader).with_field_count(field_count))
    }

    fn collect_reader<R: BufRead>(mut reader: WorkloadReader<R>) -> Result<Self, WorkloadError> {
        let ops = reader.by_ref().collect::<std::io::Result<Vec<_>>>()?;
        Ok(Workload::with_skipped(ops, reader.skipped()))
    }

    /// Load a workload file
    pub fn load(path: &Path) -> Result<Self, WorkloadError> {
        Self::load_bounded(path, None)
    }

    /// Load a workload file for a record of `field_count` fields
    pub fn load_for(path: &Path, field_count: usize) -> Result<Self, WorkloadError> {
        Self::load_bounded(path, Some(field_count))
    }

    fn load_bounded(path: &Path, field_count: Option<usize>) -> Result<Self, WorkloadError> {
        let file = File::open(path).map_err(|source| WorkloadError::FileError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = WorkloadReader::new(BufReader::new(file));
        if let Some(field_count) = field_count {
            reader = reader.with_field_count(field_count);
        }
        let workload = Self::collect_reader(reader)?;
        debug!(
            "Loaded workload {}: {} operations, {} skipped lines",
            path.display(),
            workload.len(),
            workload.skipped()
        );
        Ok(workload)
    }

    /// Write the workload in text form, one operation per line
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), WorkloadError> {
        for op in self.ops() {
            writeln!(writer, "{}", op)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the workload to a file, replacing any existing content
    pub fn save(&self, path: &Path) -> Result<(), WorkloadError> {
        let file = File::create(path).map_err(|source| WorkloadError::FileError {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(BufWriter::new(file))
    }
}
