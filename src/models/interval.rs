//! Absolute shift intervals.
//!
//! Entries are stored as a work date plus start/end time-of-day. For
//! overlap checks they are projected onto an absolute timeline.
//!
//! # Time Model
//! An interval whose end time-of-day is at or before its start ends on the
//! next calendar day (an overnight shift). A start equal to the end is a
//! zero-length window and is rejected by [`ShiftInterval::new`].

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::WeekAnchor;

/// A half-open interval [start, end) on the absolute timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInterval {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl ShiftInterval {
    /// Projects a work date and time-of-day window onto the timeline.
    ///
    /// Returns `None` when `start_time == end_time`.
    pub fn new(work_date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Option<Self> {
        if start_time == end_time {
            return None;
        }
        let start = work_date.and_time(start_time);
        let end_date = if end_time < start_time {
            work_date.checked_add_days(Days::new(1))?
        } else {
            work_date
        };
        Some(Self {
            start,
            end: end_date.and_time(end_time),
        })
    }

    /// Whether the shift runs past midnight.
    #[inline]
    pub fn crosses_midnight(&self) -> bool {
        self.end.date() > self.start.date()
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Scheduling weeks the interval occupies, earliest first.
    ///
    /// A Sunday overnight shift also occupies the following week, unless it
    /// ends exactly at Monday midnight.
    pub fn weeks(&self) -> Vec<WeekAnchor> {
        let first = WeekAnchor::containing(self.start.date());
        let last = WeekAnchor::containing(self.end.date());
        if last != first && self.end > last.monday().and_time(NaiveTime::MIN) {
            vec![first, last]
        } else {
            vec![first]
        }
    }

    /// Whether two intervals share any instant.
    ///
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
