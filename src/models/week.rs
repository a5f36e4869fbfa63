//! Week anchors.
//!
//! A scheduling week runs Monday through Sunday and is identified by its
//! Monday. The anchor is also the key of the per-week lock.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Anchor date format accepted at the service boundary.
pub const ANCHOR_FORMAT: &str = "%Y-%m-%d";

/// The Monday that identifies a scheduling week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekAnchor(NaiveDate);

impl WeekAnchor {
    /// Parses a `YYYY-MM-DD` Monday.
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        let date = NaiveDate::parse_from_str(input.trim(), ANCHOR_FORMAT)
            .map_err(|e| ScheduleError::invalid_anchor(input, format!("expected YYYY-MM-DD: {e}")))?;
        Self::from_monday(date).map_err(|_| {
            ScheduleError::invalid_anchor(input, format!("{} is not a Monday", date.weekday()))
        })
    }

    /// Wraps a date that must already be a Monday.
    pub fn from_monday(date: NaiveDate) -> Result<Self, ScheduleError> {
        if date.weekday() != Weekday::Mon {
            return Err(ScheduleError::invalid_anchor(
                date.to_string(),
                format!("{} is not a Monday", date.weekday()),
            ));
        }
        // The week must fit in the calendar.
        date.checked_add_days(Days::new(7))
            .ok_or_else(|| ScheduleError::invalid_anchor(date.to_string(), "date out of range"))?;
        Ok(Self(date))
    }

    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let back = u64::from(date.weekday().num_days_from_monday());
        Self(date.checked_sub_days(Days::new(back)).unwrap_or(date))
    }

    /// The Monday.
    #[inline]
    pub fn monday(&self) -> NaiveDate {
        self.0
    }

    /// The Sunday closing the week.
    pub fn sunday(&self) -> NaiveDate {
        self.day(6)
    }

    /// Date at `offset` days from Monday.
    ///
    /// Offsets are clamped to the week.
    pub fn day(&self, offset: u32) -> NaiveDate {
        let offset = offset.min(6);
        self.0
            .checked_add_days(Days::new(u64::from(offset)))
            .unwrap_or(self.0)
    }

    /// The seven dates of the week, Monday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..7).map(move |offset| self.day(offset))
    }

    /// Whether `date` falls within this week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday() && date <= self.sunday()
    }
}

impl std::fmt::Display for WeekAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(ANCHOR_FORMAT))
    }
}

impl TryFrom<String> for WeekAnchor {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WeekAnchor> for String {
    fn from(anchor: WeekAnchor) -> Self {
        anchor.to_string()
    }
}
