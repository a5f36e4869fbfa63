//! Weekly load and coverage reporting.
//!
//! Summarises a week's entries per staff member and against branch
//! demand, and flattens entries into export rows.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Load | Entries per staff member this week (manual + auto) |
//! | Load spread | max(load) - min(load) across the roster |
//! | Coverage rate | Covered seats / required seats |

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::assign::{pending_tokens, slot_coverage};
use crate::demand::weekly_slots;
use crate::models::{
    Branch, EntryOrigin, ScheduleEntry, ShiftType, Staff, UnfilledSlot, WeekAnchor,
};

/// One staff member's bookings for the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffLoad {
    /// Staff identifier.
    pub staff_id: String,
    /// Display name.
    pub name: String,
    /// Shift type.
    pub shift_type: ShiftType,
    /// Pinned entries.
    pub manual: u32,
    /// Auto-assigned entries.
    pub auto: u32,
}

impl StaffLoad {
    /// Total entries.
    #[inline]
    pub fn total(&self) -> u32 {
        self.manual + self.auto
    }
}

/// Load and coverage summary for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyLoadReport {
    /// Reported week.
    pub week: WeekAnchor,
    /// Per-staff load, sorted by staff id.
    pub per_staff: Vec<StaffLoad>,
    /// Seats demanded by branch coverage.
    pub required_seats: usize,
    /// Seats covered by existing entries.
    pub covered_seats: usize,
    /// Seats still uncovered, in fill order.
    pub uncovered: Vec<UnfilledSlot>,
}

impl WeeklyLoadReport {
    /// Computes the report from a week's entries.
    ///
    /// Entries dated outside the week are ignored.
    pub fn calculate(
        week: WeekAnchor,
        staff: &[Staff],
        branches: &[Branch],
        entries: &[ScheduleEntry],
    ) -> Self {
        let mut per_staff: Vec<StaffLoad> = staff
            .iter()
            .map(|s| StaffLoad {
                staff_id: s.id.clone(),
                name: s.name.clone(),
                shift_type: s.shift_type,
                manual: 0,
                auto: 0,
            })
            .collect();
        per_staff.sort_by(|a, b| a.staff_id.cmp(&b.staff_id));

        for entry in entries.iter().filter(|e| week.contains(e.work_date)) {
            let Ok(pos) = per_staff.binary_search_by(|l| l.staff_id.cmp(&entry.staff_id))
            else {
                continue;
            };
            match entry.origin {
                EntryOrigin::Manual => per_staff[pos].manual += 1,
                EntryOrigin::Auto => per_staff[pos].auto += 1,
            }
        }

        let slots = weekly_slots(&week, branches);
        let required_seats = slots.iter().map(|s| s.required_count as usize).sum();
        let coverage = slot_coverage(&week, branches, staff, entries);
        let (pending, covered_seats) = pending_tokens(&slots, &coverage);

        Self {
            week,
            per_staff,
            required_seats,
            covered_seats,
            uncovered: pending.iter().map(|t| t.to_unfilled()).collect(),
        }
    }

    /// Difference between the most and least loaded staff member.
    pub fn load_spread(&self) -> u32 {
        let loads = self.per_staff.iter().map(StaffLoad::total);
        match (loads.clone().max(), loads.min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Spread restricted to one shift type pool.
    pub fn load_spread_for(&self, shift_type: ShiftType) -> u32 {
        let loads = self
            .per_staff
            .iter()
            .filter(|l| l.shift_type == shift_type)
            .map(StaffLoad::total);
        match (loads.clone().max(), loads.min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Covered fraction of demanded seats (1.0 when nothing is demanded).
    pub fn coverage_rate(&self) -> f64 {
        if self.required_seats == 0 {
            1.0
        } else {
            self.covered_seats as f64 / self.required_seats as f64
        }
    }

    /// Load for one staff member.
    pub fn load_of(&self, staff_id: &str) -> Option<&StaffLoad> {
        self.per_staff.iter().find(|l| l.staff_id == staff_id)
    }

    /// Whether the week meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_spread: u32, min_coverage: f64) -> bool {
        self.load_spread() <= max_spread && self.coverage_rate() >= min_coverage
    }
}

/// A flattened entry for spreadsheet or CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Staff display name (id when unnamed or unknown).
    pub staff_name: String,
    /// Staff phone, if known.
    pub phone: Option<String>,
    /// Staff shift type, if known.
    pub shift_type: Option<ShiftType>,
    /// Work date.
    pub work_date: NaiveDate,
    /// Start time-of-day.
    pub start_time: NaiveTime,
    /// End time-of-day.
    pub end_time: NaiveTime,
    /// Branch identifier.
    pub branch_id: String,
    /// Entry origin.
    pub origin: EntryOrigin,
}

/// Flattens entries into export rows, sorted by date, start, branch, name.
pub fn export_rows(entries: &[ScheduleEntry], staff: &[Staff]) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = entries
        .iter()
        .map(|e| {
            let person = staff.iter().find(|s| s.id == e.staff_id);
            let staff_name = match person {
                Some(s) if !s.name.is_empty() => s.name.clone(),
                _ => e.staff_id.clone(),
            };
            ExportRow {
                staff_name,
                phone: person.and_then(|s| s.phone.clone()),
                shift_type: person.map(|s| s.shift_type),
                work_date: e.work_date,
                start_time: e.start_time,
                end_time: e.end_time,
                branch_id: e.branch_id.clone(),
                origin: e.origin,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.work_date, a.start_time, &a.branch_id, &a.staff_name).cmp(&(
            b.work_date,
            b.start_time,
            &b.branch_id,
            &b.staff_name,
        ))
    });
    rows
}
