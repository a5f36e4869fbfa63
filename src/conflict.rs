//! Double-booking detection.
//!
//! A staff member may not hold two entries whose absolute intervals share
//! any instant. Shifts are shorter than a day, so only entries starting on
//! the candidate's date or one day either side can collide; callers pass
//! that neighbourhood (or more, it is filtered here).
//!
//! Used by manual entry creation, by the assignment engine, and by the
//! in-memory store's insert guard.

use chrono::NaiveDate;

use crate::models::{ScheduleEntry, ShiftInterval};

/// Days either side of the candidate date that can hold a colliding entry.
pub const NEIGHBOR_DAYS: i64 = 1;

/// Whether `other` is within [`NEIGHBOR_DAYS`] of `date`.
#[inline]
pub fn is_neighbor_date(date: NaiveDate, other: NaiveDate) -> bool {
    (other - date).num_days().abs() <= NEIGHBOR_DAYS
}

/// Whether `candidate` overlaps any of `intervals`.
pub fn overlaps_any<'a>(
    candidate: &ShiftInterval,
    intervals: impl IntoIterator<Item = &'a ShiftInterval>,
) -> bool {
    intervals.into_iter().any(|i| candidate.overlaps(i))
}

/// Finds an entry of `staff_id` that overlaps `candidate`.
///
/// Entries of other staff, entries outside the date neighbourhood and
/// malformed (zero-length) entries are ignored.
pub fn find_conflict<'a>(
    staff_id: &str,
    candidate: &ShiftInterval,
    entries: impl IntoIterator<Item = &'a ScheduleEntry>,
) -> Option<&'a ScheduleEntry> {
    let date = candidate.start.date();
    entries.into_iter().find(|e| {
        e.staff_id == staff_id
            && is_neighbor_date(date, e.work_date)
            && e.interval().is_some_and(|i| candidate.overlaps(&i))
    })
}

/// Whether `candidate` would double-book `staff_id`.
pub fn has_conflict<'a>(
    staff_id: &str,
    candidate: &ShiftInterval,
    entries: impl IntoIterator<Item = &'a ScheduleEntry>,
) -> bool {
    find_conflict(staff_id, candidate, entries).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryId, NewEntry};
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn entry(id: u64, staff: &str, day: u32, start: u32, end: u32) -> ScheduleEntry {
        NewEntry::manual(staff, "B1", d(day), t(start), t(end)).with_id(EntryId(id))
    }

    fn window(day: u32, start: u32, end: u32) -> ShiftInterval {
        ShiftInterval::new(d(day), t(start), t(end)).unwrap()
    }

    #[test]
    fn test_same_day_overlap() {
        let entries = vec![entry(1, "A", 3, 10, 18)];
        let hit = find_conflict("A", &window(3, 12, 20), &entries);
        assert_eq!(hit.map(|e| e.id), Some(EntryId(1)));
    }

    #[test]
    fn test_touching_is_not_conflict() {
        let entries = vec![entry(1, "A", 3, 10, 18)];
        assert!(!has_conflict("A", &window(3, 18, 2), &entries));
        assert!(!has_conflict("A", &window(3, 6, 10), &entries));
    }

    #[test]
    fn test_other_staff_ignored() {
        let entries = vec![entry(1, "B", 3, 10, 18)];
        assert!(!has_conflict("A", &window(3, 10, 18), &entries));
    }

    #[test]
    fn test_overnight_from_previous_day() {
        // Sunday night 22:00 - Monday 06:00 collides with Monday 05:00 start
        let entries = vec![entry(1, "A", 2, 22, 6)];
        assert!(has_conflict("A", &window(3, 5, 12), &entries));
        assert!(!has_conflict("A", &window(3, 6, 12), &entries));
    }

    #[test]
    fn test_overnight_candidate_into_next_day() {
        let entries = vec![entry(1, "A", 4, 1, 9)];
        assert!(has_conflict("A", &window(3, 18, 2), &entries));
    }

    #[test]
    fn test_far_dates_ignored() {
        let entries = vec![entry(1, "A", 10, 10, 18)];
        assert!(!has_conflict("A", &window(3, 10, 18), &entries));
        assert!(!is_neighbor_date(d(3), d(5)));
        assert!(is_neighbor_date(d(3), d(2)));
    }

    #[test]
    fn test_overlaps_any() {
        let booked = [window(3, 10, 18), window(4, 10, 18)];
        assert!(overlaps_any(&window(4, 17, 19), &booked));
        assert!(!overlaps_any(&window(5, 10, 18), &booked));
    }
}
