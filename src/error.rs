//! Error types for the scheduling service and its store boundary.
//!
//! # Error Hierarchy
//!
//! - [`ScheduleError`]: returned by every [`ScheduleService`](crate::service::ScheduleService)
//!   operation. Validation variants are raised before the week lock is taken.
//! - [`StoreError`]: returned by [`ScheduleStore`](crate::store::ScheduleStore)
//!   implementations and converted into [`ScheduleError::Store`].
//!
//! An unfilled slot is never an error. It is reported in the auto-assign
//! outcome instead.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::EntryId;
use crate::validation::ValidationError;

/// Errors surfaced at the service boundary.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The week anchor is malformed or is not a Monday.
    ///
    /// Detected before any store access.
    #[error("invalid week anchor '{input}': {reason}")]
    InvalidWeekAnchor {
        /// The rejected input, verbatim.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A shift window has zero length.
    #[error("invalid shift interval on {work_date}: start {start_time} equals end {end_time}")]
    InvalidInterval {
        /// Date of the rejected interval.
        work_date: NaiveDate,
        /// Start time-of-day.
        start_time: NaiveTime,
        /// End time-of-day.
        end_time: NaiveTime,
    },

    /// The referenced staff member is not on the roster.
    #[error("unknown staff member '{0}'")]
    UnknownStaff(String),

    /// The referenced branch is not configured.
    #[error("unknown branch '{0}'")]
    UnknownBranch(String),

    /// The candidate interval overlaps an existing entry of the same staff member.
    #[error("staff '{staff_id}' already has overlapping entry {existing} near {work_date}")]
    Conflict {
        /// Staff member that would be double-booked.
        staff_id: String,
        /// Work date of the rejected candidate.
        work_date: NaiveDate,
        /// Entry the candidate collides with.
        existing: EntryId,
    },

    /// Roster or branch configuration failed structural validation.
    #[error("invalid roster configuration: {} issue(s)", .0.len())]
    InvalidRoster(Vec<ValidationError>),

    /// The schedule store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScheduleError {
    pub(crate) fn invalid_anchor(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidWeekAnchor {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by schedule store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Inserting the entry would double-book its staff member.
    #[error("entry for staff '{staff_id}' on {work_date} overlaps entry {existing}")]
    Conflict {
        /// Staff member of the rejected entry.
        staff_id: String,
        /// Work date of the rejected entry.
        work_date: NaiveDate,
        /// Entry already holding the interval.
        existing: EntryId,
    },

    /// The entry is malformed (e.g. a zero-length window).
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// No entry with this identifier exists.
    #[error("entry {0} not found")]
    NotFound(EntryId),

    /// Backend failure (I/O, connection, serialization).
    #[error("store backend failure: {0}")]
    Backend(String),
}
