//! Schedule entries.
//!
//! A schedule entry books one staff member at one branch for one shift.
//! It is the only persisted, mutable entity. Entries created by a
//! supervisor are `Manual` (pinned); entries created by the engine are
//! `Auto`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::ShiftInterval;

/// Store-assigned entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who created an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Created by a supervisor. Never touched by auto-assign.
    Manual,
    /// Created by auto-assign.
    Auto,
}

/// An entry that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    /// Booked staff member.
    pub staff_id: String,
    /// Branch worked at.
    pub branch_id: String,
    /// Date the shift starts on.
    pub work_date: NaiveDate,
    /// Start time-of-day.
    pub start_time: NaiveTime,
    /// End time-of-day (at or before start = next day).
    pub end_time: NaiveTime,
    /// Creator.
    pub origin: EntryOrigin,
}

/// A persisted schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Booked staff member.
    pub staff_id: String,
    /// Branch worked at.
    pub branch_id: String,
    /// Date the shift starts on.
    pub work_date: NaiveDate,
    /// Start time-of-day.
    pub start_time: NaiveTime,
    /// End time-of-day (at or before start = next day).
    pub end_time: NaiveTime,
    /// Creator.
    pub origin: EntryOrigin,
}

impl NewEntry {
    /// Creates a manual (pinned) entry.
    pub fn manual(
        staff_id: impl Into<String>,
        branch_id: impl Into<String>,
        work_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            staff_id: staff_id.into(),
            branch_id: branch_id.into(),
            work_date,
            start_time,
            end_time,
            origin: EntryOrigin::Manual,
        }
    }

    /// Creates an auto-assigned entry.
    pub fn auto(
        staff_id: impl Into<String>,
        branch_id: impl Into<String>,
        work_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            origin: EntryOrigin::Auto,
            ..Self::manual(staff_id, branch_id, work_date, start_time, end_time)
        }
    }

    /// Absolute interval, `None` for a zero-length window.
    pub fn interval(&self) -> Option<ShiftInterval> {
        ShiftInterval::new(self.work_date, self.start_time, self.end_time)
    }

    /// Attaches a store identifier.
    pub fn with_id(self, id: EntryId) -> ScheduleEntry {
        ScheduleEntry {
            id,
            staff_id: self.staff_id,
            branch_id: self.branch_id,
            work_date: self.work_date,
            start_time: self.start_time,
            end_time: self.end_time,
            origin: self.origin,
        }
    }
}

impl ScheduleEntry {
    /// Absolute interval, `None` for a zero-length window.
    pub fn interval(&self) -> Option<ShiftInterval> {
        ShiftInterval::new(self.work_date, self.start_time, self.end_time)
    }

    /// Whether the entry is pinned.
    #[inline]
    pub fn is_manual(&self) -> bool {
        self.origin == EntryOrigin::Manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_new_entry_origins() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let m = NewEntry::manual("A", "B1", date, t(10), t(18));
        let a = NewEntry::auto("A", "B1", date, t(10), t(18));
        assert_eq!(m.origin, EntryOrigin::Manual);
        assert_eq!(a.origin, EntryOrigin::Auto);

        let e = m.with_id(EntryId(7));
        assert_eq!(e.id, EntryId(7));
        assert!(e.is_manual());
        assert_eq!(e.interval().unwrap().duration_minutes(), 480);
    }

    #[test]
    fn test_entry_json_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let e = NewEntry::auto("A", "B1", date, t(18), t(2)).with_id(EntryId(1));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["origin"], "auto");
        assert_eq!(json["work_date"], "2024-06-03");
        assert_eq!(json["end_time"], "02:00:00");
    }
}
