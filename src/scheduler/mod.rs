//! Weekly auto-assignment and schedule reporting.
//!
//! # Algorithm
//!
//! `AutoAssigner` is a greedy, least-loaded-first heuristic over seats in a
//! fixed order. It is not an optimiser, but it is deterministic, idempotent
//! and keeps per-pool load within one entry under uniform demand.
//!
//! # Reporting
//!
//! `WeeklyLoadReport` computes per-staff load, load spread and demand
//! coverage for a week; `export_rows` flattens entries for export.

mod assign;
mod report;

pub use assign::{AssignmentOutcome, AssignmentRequest, AutoAssigner};
pub use report::{export_rows, ExportRow, StaffLoad, WeeklyLoadReport};
