//! Greedy least-loaded weekly auto-assignment.
//!
//! # Algorithm
//!
//! 1. Expand branch coverage into seats (see [`crate::demand`]).
//! 2. Drop seats already covered by an existing entry (manual or auto) for
//!    the same (branch, date, shift type), lowest seat index first.
//! 3. Seed a per-staff load counter with each person's entries this week.
//! 4. Walk the remaining seats in fill order. For each, pick the eligible
//!    staff member with no overlapping booking and the lowest load, ties
//!    by ascending staff id. No candidate → the seat is reported unfilled.
//! 5. Every pick becomes an `auto` entry, bumps the load and is booked so
//!    later seats in the same pass see it.
//!
//! Manual entries are read, never written. Given identical inputs the
//! output is identical, and a second pass over its own output adds
//! nothing.
//!
//! # Complexity
//! O(t * s * k) where t=seats, s=staff, k=bookings per staff member.

use std::collections::HashMap;

use chrono::Datelike;
use tracing::{debug, info, warn};

use crate::conflict;
use crate::demand::weekly_slots;
use crate::models::{
    Branch, DemandToken, NewEntry, ScheduleEntry, ShiftInterval, ShiftSlot, ShiftType, SlotKey,
    Staff, UnfilledSlot, WeekAnchor,
};

/// Input snapshot for one auto-assign pass.
#[derive(Debug, Clone)]
pub struct AssignmentRequest {
    /// Week being filled.
    pub week: WeekAnchor,
    /// Roster snapshot.
    pub staff: Vec<Staff>,
    /// Branch configuration snapshot.
    pub branches: Vec<Branch>,
    /// Persisted entries: the week's entries plus any neighbouring entries
    /// that may overlap its first or last day.
    pub existing: Vec<ScheduleEntry>,
}

impl AssignmentRequest {
    /// Creates a request with no existing entries.
    pub fn new(week: WeekAnchor, staff: Vec<Staff>, branches: Vec<Branch>) -> Self {
        Self {
            week,
            staff,
            branches,
            existing: Vec::new(),
        }
    }

    /// Sets the existing entries.
    pub fn with_existing(mut self, existing: Vec<ScheduleEntry>) -> Self {
        self.existing = existing;
        self
    }
}

/// Result of an auto-assign pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// New `auto` entries, in fill order.
    pub created: Vec<NewEntry>,
    /// Seats with no eligible, conflict-free candidate, in fill order.
    pub unfilled: Vec<UnfilledSlot>,
    /// Seats already covered by existing entries.
    pub already_covered: usize,
}

impl AssignmentOutcome {
    /// Whether every seat of the week is now covered.
    pub fn is_fully_covered(&self) -> bool {
        self.unfilled.is_empty()
    }
}

/// Weekly auto-assignment engine.
///
/// # Example
///
/// ```
/// use u_shift::models::{Branch, ShiftType, Staff, WeekAnchor, WEEKDAYS};
/// use u_shift::scheduler::{AssignmentRequest, AutoAssigner};
///
/// let week = WeekAnchor::parse("2024-06-03").unwrap();
/// let branch = Branch::new("B1").with_coverage(WEEKDAYS[..5].iter().copied(), ShiftType::Day, 1);
/// let staff = vec![Staff::day("A"), Staff::day("B")];
///
/// let outcome = AutoAssigner::new().assign(&AssignmentRequest::new(week, staff, vec![branch]));
/// assert_eq!(outcome.created.len(), 5);
/// assert!(outcome.unfilled.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutoAssigner;

impl AutoAssigner {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Fills every uncovered seat of the request's week.
    pub fn assign(&self, request: &AssignmentRequest) -> AssignmentOutcome {
        let week = &request.week;
        let slots = weekly_slots(week, &request.branches);
        let coverage = slot_coverage(week, &request.branches, &request.staff, &request.existing);
        let (pending, already_covered) = pending_tokens(&slots, &coverage);

        let mut roster: Vec<&Staff> = request.staff.iter().collect();
        roster.sort_by(|a, b| a.id.cmp(&b.id));

        let mut load = initial_load(week, &request.staff, &request.existing);
        let mut booked: HashMap<&str, Vec<ShiftInterval>> = HashMap::new();
        for entry in &request.existing {
            if let Some(interval) = entry.interval() {
                booked.entry(entry.staff_id.as_str()).or_default().push(interval);
            }
        }

        let mut outcome = AssignmentOutcome {
            already_covered,
            ..AssignmentOutcome::default()
        };

        for token in &pending {
            let Some(window) = token.interval() else {
                warn!(branch = %token.branch_id, date = %token.date, "zero-length seat window, skipping");
                outcome.unfilled.push(token.to_unfilled());
                continue;
            };

            let weekday = token.date.weekday();
            let pick = roster
                .iter()
                .filter(|s| s.is_eligible(token.shift_type, weekday))
                .filter(|s| {
                    !conflict::overlaps_any(
                        &window,
                        booked.get(s.id.as_str()).into_iter().flatten(),
                    )
                })
                .min_by_key(|s| load.get(s.id.as_str()).copied().unwrap_or(0));

            match pick {
                Some(staff) => {
                    let id = staff.id.as_str();
                    *load.entry(id).or_insert(0) += 1;
                    booked.entry(id).or_default().push(window);
                    debug!(
                        staff = id,
                        branch = %token.branch_id,
                        date = %token.date,
                        shift = %token.shift_type,
                        seat = token.index,
                        "seat assigned"
                    );
                    outcome.created.push(NewEntry::auto(
                        id,
                        &token.branch_id,
                        token.date,
                        token.start_time,
                        token.end_time,
                    ));
                }
                None => {
                    warn!(
                        branch = %token.branch_id,
                        date = %token.date,
                        shift = %token.shift_type,
                        seat = token.index,
                        "no eligible staff for seat"
                    );
                    outcome.unfilled.push(token.to_unfilled());
                }
            }
        }

        info!(
            week = %week,
            created = outcome.created.len(),
            unfilled = outcome.unfilled.len(),
            already_covered,
            "auto-assign pass complete"
        );
        outcome
    }
}

/// Determines which slot shift type an existing entry occupies.
///
/// An entry whose times match a canonical window of its branch on that
/// weekday takes that window's shift type; if Day and Night share the window,
/// the staff member's type picks between them. Otherwise it counts as its
/// staff member's shift type. Entries matching neither are not demand.
pub(crate) fn classify_entry(
    entry: &ScheduleEntry,
    branches: &HashMap<&str, &Branch>,
    staff: &HashMap<&str, &Staff>,
) -> Option<ShiftType> {
    let weekday = entry.work_date.weekday();
    let staff_type = staff.get(entry.staff_id.as_str()).map(|s| s.shift_type);
    branches
        .get(entry.branch_id.as_str())
        .and_then(|b| b.shift_type_of_window(weekday, entry.start_time, entry.end_time, staff_type))
        .or(staff_type)
}

/// Counts existing in-week entries per slot.
pub(crate) fn slot_coverage(
    week: &WeekAnchor,
    branches: &[Branch],
    staff: &[Staff],
    existing: &[ScheduleEntry],
) -> HashMap<SlotKey, u32> {
    let branch_index: HashMap<&str, &Branch> = branches.iter().map(|b| (b.id.as_str(), b)).collect();
    let staff_index: HashMap<&str, &Staff> = staff.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut coverage: HashMap<SlotKey, u32> = HashMap::new();
    for entry in existing.iter().filter(|e| week.contains(e.work_date)) {
        if let Some(shift_type) = classify_entry(entry, &branch_index, &staff_index) {
            *coverage
                .entry((entry.branch_id.clone(), entry.work_date, shift_type))
                .or_insert(0) += 1;
        }
    }
    coverage
}

/// Seats not yet covered, in fill order, and how many were covered.
pub(crate) fn pending_tokens(
    slots: &[ShiftSlot],
    coverage: &HashMap<SlotKey, u32>,
) -> (Vec<DemandToken>, usize) {
    let mut pending = Vec::new();
    let mut covered_total = 0usize;
    for slot in slots {
        let covered = coverage
            .get(&slot.key())
            .copied()
            .unwrap_or(0)
            .min(slot.required_count);
        covered_total += covered as usize;
        pending.extend(slot.tokens().skip(covered as usize));
    }
    (pending, covered_total)
}

/// Entries per staff member within the week, for every rostered person.
pub(crate) fn initial_load<'a>(
    week: &WeekAnchor,
    staff: &'a [Staff],
    existing: &[ScheduleEntry],
) -> HashMap<&'a str, u32> {
    let mut load: HashMap<&'a str, u32> = staff.iter().map(|s| (s.id.as_str(), 0)).collect();
    for entry in existing.iter().filter(|e| week.contains(e.work_date)) {
        if let Some(count) = load.get_mut(entry.staff_id.as_str()) {
            *count += 1;
        }
    }
    load
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoverageRule, EntryId, EntryOrigin, WEEKDAYS};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn week() -> WeekAnchor {
        WeekAnchor::parse("2024-06-03").unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn weekday_branch() -> Branch {
        Branch::new("B1").with_coverage(WEEKDAYS[..5].iter().copied(), ShiftType::Day, 1)
    }

    fn persist(entries: Vec<NewEntry>, first_id: u64) -> Vec<ScheduleEntry> {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, e)| e.with_id(EntryId(first_id + i as u64)))
            .collect()
    }

    #[test]
    fn test_alternating_fill() {
        let request = AssignmentRequest::new(
            week(),
            vec![Staff::day("B"), Staff::day("A")],
            vec![weekday_branch()],
        );
        let outcome = AutoAssigner::new().assign(&request);

        let staff: Vec<_> = outcome.created.iter().map(|e| e.staff_id.as_str()).collect();
        assert_eq!(staff, vec!["A", "B", "A", "B", "A"]);
        let dates: Vec<_> = outcome.created.iter().map(|e| e.work_date).collect();
        assert_eq!(dates, vec![d(3), d(4), d(5), d(6), d(7)]);
        assert!(outcome.created.iter().all(|e| e.origin == EntryOrigin::Auto));
        assert!(outcome.is_fully_covered());
    }

    #[test]
    fn test_pinned_entry_consumes_demand() {
        let pinned = NewEntry::manual("A", "B1", d(5), t(10), t(18)).with_id(EntryId(1));
        let request = AssignmentRequest::new(
            week(),
            vec![Staff::day("A"), Staff::day("B")],
            vec![weekday_branch()],
        )
        .with_existing(vec![pinned]);

        let outcome = AutoAssigner::new().assign(&request);
        let dates: Vec<_> = outcome.created.iter().map(|e| e.work_date).collect();
        assert_eq!(dates, vec![d(3), d(4), d(6), d(7)]);
        assert_eq!(outcome.already_covered, 1);

        // A starts with load 1, so B takes Monday.
        assert_eq!(outcome.created[0].staff_id, "B");
    }

    #[test]
    fn test_second_pass_adds_nothing() {
        let request = AssignmentRequest::new(
            week(),
            vec![Staff::day("A"), Staff::day("B")],
            vec![weekday_branch()],
        );
        let engine = AutoAssigner::new();
        let first = engine.assign(&request);
        let rerun = request.clone().with_existing(persist(first.created.clone(), 1));
        let second = engine.assign(&rerun);

        assert_eq!(first.created.len(), 5);
        assert!(second.created.is_empty());
        assert!(second.unfilled.is_empty());
        assert_eq!(second.already_covered, 5);
    }

    #[test]
    fn test_deterministic() {
        let request = AssignmentRequest::new(
            week(),
            vec![Staff::day("C"), Staff::day("A"), Staff::day("B"), Staff::night("N")],
            vec![Branch::new("B1")
                .with_coverage(WEEKDAYS, ShiftType::Day, 2)
                .with_coverage(WEEKDAYS, ShiftType::Night, 1)],
        );
        let a = AutoAssigner::new().assign(&request);
        let b = AutoAssigner::new().assign(&request);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_night_staff_reports_unfilled() {
        let branch = Branch::new("B1").with_coverage([Weekday::Wed], ShiftType::Night, 1);
        let request = AssignmentRequest::new(week(), vec![Staff::day("A")], vec![branch]);
        let outcome = AutoAssigner::new().assign(&request);

        assert!(outcome.created.is_empty());
        assert_eq!(
            outcome.unfilled,
            vec![UnfilledSlot {
                branch_id: "B1".into(),
                date: d(5),
                shift_type: ShiftType::Night,
            }]
        );
    }

    #[test]
    fn test_no_double_booking_across_branches() {
        // Two branches need the same Monday day seat; one person cannot do both.
        let b1 = Branch::new("B1").with_coverage([Weekday::Mon], ShiftType::Day, 1);
        let b2 = Branch::new("B2").with_coverage([Weekday::Mon], ShiftType::Day, 1);
        let request = AssignmentRequest::new(week(), vec![Staff::day("A")], vec![b1, b2]);
        let outcome = AutoAssigner::new().assign(&request);

        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].branch_id, "B1");
        assert_eq!(outcome.unfilled.len(), 1);
        assert_eq!(outcome.unfilled[0].branch_id, "B2");
    }

    #[test]
    fn test_multi_seat_slot_uses_distinct_staff() {
        let branch = Branch::new("B1").with_coverage([Weekday::Mon], ShiftType::Day, 3);
        let request = AssignmentRequest::new(
            week(),
            vec![Staff::day("A"), Staff::day("B"), Staff::day("C")],
            vec![branch],
        );
        let outcome = AutoAssigner::new().assign(&request);
        let staff: Vec<_> = outcome.created.iter().map(|e| e.staff_id.as_str()).collect();
        assert_eq!(staff, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_overnight_neighbor_blocks_candidate() {
        // A works Sunday night before the week into Monday 06:00 at another
        // branch; a Monday 05:00 seat must go to B.
        let branch = Branch::new("B1").with_rule(crate::models::CoverageRule::new(
            Weekday::Mon,
            ShiftType::Day,
            1,
            t(5),
            t(13),
        ));
        let prior = NewEntry::manual("A", "B9", d(2), t(22), t(6)).with_id(EntryId(1));
        let request = AssignmentRequest::new(
            week(),
            vec![Staff::day("A"), Staff::day("B")],
            vec![branch],
        )
        .with_existing(vec![prior]);

        let outcome = AutoAssigner::new().assign(&request);
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].staff_id, "B");
    }

    #[test]
    fn test_work_days_respected() {
        let request = AssignmentRequest::new(
            week(),
            vec![
                Staff::day("A").with_work_days([Weekday::Mon]),
                Staff::day("B").with_work_days([Weekday::Tue]),
            ],
            vec![Branch::new("B1").with_coverage([Weekday::Mon, Weekday::Tue], ShiftType::Day, 1)],
        );
        let outcome = AutoAssigner::new().assign(&request);
        let staff: Vec<_> = outcome.created.iter().map(|e| e.staff_id.as_str()).collect();
        assert_eq!(staff, vec!["A", "B"]);
    }

    #[test]
    fn test_fairness_bound() {
        let staff: Vec<_> = ["A", "B", "C"].into_iter().map(Staff::day).collect();
        let branch = Branch::new("B1").with_coverage(WEEKDAYS, ShiftType::Day, 1);
        let outcome = AutoAssigner::new().assign(&AssignmentRequest::new(week(), staff, vec![branch]));

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for e in &outcome.created {
            *counts.entry(e.staff_id.as_str()).or_insert(0) += 1;
        }
        let max = counts.values().max().copied().unwrap_or(0);
        let min = ["A", "B", "C"]
            .iter()
            .map(|id| counts.get(id).copied().unwrap_or(0))
            .min()
            .unwrap_or(0);
        assert!(max - min <= 1);
    }

    #[test]
    fn test_classify_by_window_then_staff() {
        let branch = Branch::new("B1")
            .with_coverage([Weekday::Mon], ShiftType::Day, 1)
            .with_coverage([Weekday::Mon], ShiftType::Night, 1);
        let staff = vec![Staff::day("A")];
        // A day worker covering the canonical night window counts as night.
        let on_night = NewEntry::manual("A", "B1", d(3), t(18), t(2)).with_id(EntryId(1));
        // Off-canonical hours fall back to the staff member's type.
        let odd_hours = NewEntry::manual("A", "B1", d(4), t(8), t(12)).with_id(EntryId(2));

        let coverage = slot_coverage(&week(), &[branch], &staff, &[on_night, odd_hours]);
        assert_eq!(coverage.get(&("B1".to_string(), d(3), ShiftType::Night)), Some(&1));
        assert_eq!(coverage.get(&("B1".to_string(), d(4), ShiftType::Day)), Some(&1));
        assert_eq!(coverage.get(&("B1".to_string(), d(3), ShiftType::Day)), None);
    }

    #[test]
    fn test_identical_day_night_windows_rerun_adds_nothing() {
        let branch = Branch::new("B1")
            .with_rule(CoverageRule::new(Weekday::Mon, ShiftType::Day, 1, t(9), t(21)))
            .with_rule(CoverageRule::new(Weekday::Mon, ShiftType::Night, 1, t(9), t(21)));
        let staff = vec![Staff::day("A"), Staff::night("N1"), Staff::night("N2")];

        let first = AutoAssigner::new().assign(&AssignmentRequest::new(
            week(),
            staff.clone(),
            vec![branch.clone()],
        ));
        assert_eq!(first.created.len(), 2);
        assert!(first.unfilled.is_empty());

        let existing = persist(first.created, 1);
        let coverage = slot_coverage(&week(), &[branch.clone()], &staff, &existing);
        assert_eq!(coverage.get(&("B1".to_string(), d(3), ShiftType::Day)), Some(&1));
        assert_eq!(coverage.get(&("B1".to_string(), d(3), ShiftType::Night)), Some(&1));

        let second = AutoAssigner::new().assign(
            &AssignmentRequest::new(week(), staff, vec![branch]).with_existing(existing),
        );
        assert!(second.created.is_empty());
        assert_eq!(second.already_covered, 2);
    }

    #[test]
    fn test_over_covered_slot_is_not_negative() {
        let branch = Branch::new("B1").with_coverage([Weekday::Mon], ShiftType::Day, 1);
        let existing = persist(
            vec![
                NewEntry::manual("A", "B1", d(3), t(10), t(18)),
                NewEntry::manual("B", "B1", d(3), t(10), t(18)),
            ],
            1,
        );
        let request = AssignmentRequest::new(
            week(),
            vec![Staff::day("A"), Staff::day("B")],
            vec![branch],
        )
        .with_existing(existing);
        let outcome = AutoAssigner::new().assign(&request);
        assert!(outcome.created.is_empty());
        assert_eq!(outcome.already_covered, 1);
    }

    #[test]
    fn test_empty_input() {
        let outcome = AutoAssigner::new().assign(&AssignmentRequest::new(week(), vec![], vec![]));
        assert!(outcome.created.is_empty());
        assert!(outcome.unfilled.is_empty());
    }
}
