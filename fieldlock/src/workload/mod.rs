//! Workload sources
//!
//! Operations replayed against the shared record, plus the boundary pieces
//! that produce them: the text codec and the scenario-driven generator.

pub mod generator;
pub mod parser;
pub mod types;

pub use generator::{Scenario, WorkloadGenerator};
pub use parser::{UnrecognizedLine, WorkloadReader, parse_line, parse_line_for};
pub use types::{Operation, OperationKind, Workload, WorkloadError};
