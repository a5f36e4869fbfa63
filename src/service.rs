//! Request-level operations: auto-assign, manual create, delete, report.
//!
//! Every operation validates its input first, then takes the week lock,
//! reads fresh state from the store, mutates, and releases the lock. No
//! state is kept between calls apart from the lock table.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::conflict;
use crate::error::{ScheduleError, StoreError};
use crate::lock::WeekLockManager;
use crate::models::{
    Branch, EntryId, NewEntry, ScheduleEntry, ShiftInterval, Staff, UnfilledSlot, WeekAnchor,
};
use crate::scheduler::{
    export_rows, AssignmentRequest, AutoAssigner, ExportRow, WeeklyLoadReport,
};
use crate::store::{RosterProvider, ScheduleStore};
use crate::validation::validate_roster;

/// A supervisor's request to pin a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntryRequest {
    /// Staff member to book.
    pub staff_id: String,
    /// Branch to work at.
    pub branch_id: String,
    /// Date the shift starts on.
    pub work_date: NaiveDate,
    /// Start time-of-day.
    pub start_time: NaiveTime,
    /// End time-of-day (at or before start = next day).
    pub end_time: NaiveTime,
}

impl ManualEntryRequest {
    /// Creates a request.
    pub fn new(
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
        }
    }

    fn into_entry(self) -> NewEntry {
        NewEntry::manual(
            self.staff_id,
            self.branch_id,
            self.work_date,
            self.start_time,
            self.end_time,
        )
    }
}

/// Result of an auto-assign request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAssignReport {
    /// Week that was filled.
    pub week: WeekAnchor,
    /// Entries created by this run, in fill order.
    pub created: Vec<ScheduleEntry>,
    /// Seats left without staff.
    pub unfilled: Vec<UnfilledSlot>,
}

impl AutoAssignReport {
    /// Number of entries created.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Scheduling service over a store and a roster source.
///
/// Share it between request handlers with `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct ScheduleService<S, R> {
    store: S,
    roster: R,
    locks: WeekLockManager,
    engine: AutoAssigner,
}

impl<S: ScheduleStore, R: RosterProvider> ScheduleService<S, R> {
    /// Creates a service.
    pub fn new(store: S, roster: R) -> Self {
        Self {
            store,
            roster,
            locks: WeekLockManager::new(),
            engine: AutoAssigner::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The roster source.
    pub fn roster(&self) -> &R {
        &self.roster
    }

    /// The week lock table.
    pub fn locks(&self) -> &WeekLockManager {
        &self.locks
    }

    /// Fills every uncovered seat of the week anchored at `anchor` (`YYYY-MM-DD`, a Monday).
    ///
    /// Rejects a bad anchor with `InvalidWeekAnchor` before touching the
    /// store. Seats nobody can take are reported, not treated as errors. If
    /// the store fails part-way, entries created by this run are removed
    /// again before the error is returned.
    pub fn auto_assign(&self, anchor: &str) -> Result<AutoAssignReport, ScheduleError> {
        let week = WeekAnchor::parse(anchor)?;
        self.auto_assign_week(week)
    }

    /// [`auto_assign`](Self::auto_assign) for an already parsed week.
    pub fn auto_assign_week(&self, week: WeekAnchor) -> Result<AutoAssignReport, ScheduleError> {
        let staff = self.roster.list_staff()?;
        let branches = self.roster.list_branches()?;
        validate_roster(&staff, &branches).map_err(ScheduleError::InvalidRoster)?;

        let _guards = self.locks.lock_all(weeks_reached(week, &branches));
        let existing = self.entries_around(&week, &staff)?;
        let request = AssignmentRequest::new(week, staff, branches).with_existing(existing);
        let outcome = self.engine.assign(&request);

        let created = self.insert_all(outcome.created)?;
        info!(
            week = %week,
            created = created.len(),
            unfilled = outcome.unfilled.len(),
            "auto-assign committed"
        );
        Ok(AutoAssignReport {
            week,
            created,
            unfilled: outcome.unfilled,
        })
    }

    /// Pins a shift for a staff member.
    ///
    /// Fails with `Conflict` if it overlaps any of that person's entries,
    /// including overnight shifts from the previous day. A Sunday overnight
    /// shift holds the following week's lock too.
    pub fn create_manual(&self, request: ManualEntryRequest) -> Result<ScheduleEntry, ScheduleError> {
        let interval = ShiftInterval::new(request.work_date, request.start_time, request.end_time)
            .ok_or(ScheduleError::InvalidInterval {
                work_date: request.work_date,
                start_time: request.start_time,
                end_time: request.end_time,
            })?;
        if !self.roster.list_staff()?.iter().any(|s| s.id == request.staff_id) {
            return Err(ScheduleError::UnknownStaff(request.staff_id));
        }
        if !self
            .roster
            .list_branches()?
            .iter()
            .any(|b| b.id == request.branch_id)
        {
            return Err(ScheduleError::UnknownBranch(request.branch_id));
        }

        let _guards = self.locks.lock_all(interval.weeks());

        let nearby = self
            .store
            .list_entries_for_staff_near(&request.staff_id, request.work_date)?;
        if let Some(existing) = conflict::find_conflict(&request.staff_id, &interval, &nearby) {
            return Err(ScheduleError::Conflict {
                staff_id: request.staff_id,
                work_date: request.work_date,
                existing: existing.id,
            });
        }

        let entry = request.into_entry();
        let id = self.store.insert_entry(entry.clone()).map_err(|e| match e {
            StoreError::Conflict {
                staff_id,
                work_date,
                existing,
            } => ScheduleError::Conflict {
                staff_id,
                work_date,
                existing,
            },
            other => ScheduleError::Store(other),
        })?;
        info!(id = %id, staff = %entry.staff_id, date = %entry.work_date, "manual entry created");
        Ok(entry.with_id(id))
    }

    /// Deletes an entry. Unknown ids succeed without effect.
    pub fn delete_entry(&self, id: EntryId) -> Result<(), ScheduleError> {
        let Some(entry) = self.store.get_entry(id)? else {
            debug!(id = %id, "delete of unknown entry ignored");
            return Ok(());
        };

        let _guard = self.locks.lock(WeekAnchor::containing(entry.work_date));
        match self.store.delete_entry(id) {
            Ok(()) => {
                info!(id = %id, staff = %entry.staff_id, date = %entry.work_date, "entry deleted");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                debug!(id = %id, "entry already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Entries of the week anchored at `anchor`.
    pub fn list_week(&self, anchor: &str) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        let week = WeekAnchor::parse(anchor)?;
        Ok(self.store.list_entries(&week)?)
    }

    /// Load and coverage summary of the week anchored at `anchor`.
    pub fn weekly_report(&self, anchor: &str) -> Result<WeeklyLoadReport, ScheduleError> {
        let week = WeekAnchor::parse(anchor)?;
        let staff = self.roster.list_staff()?;
        let branches = self.roster.list_branches()?;

        let _guard = self.locks.lock(week);
        let entries = self.store.list_entries(&week)?;
        Ok(WeeklyLoadReport::calculate(week, &staff, &branches, &entries))
    }

    /// Export rows for the week anchored at `anchor`.
    pub fn export_week(&self, anchor: &str) -> Result<Vec<ExportRow>, ScheduleError> {
        let week = WeekAnchor::parse(anchor)?;
        let staff = self.roster.list_staff()?;
        let entries = self.store.list_entries(&week)?;
        Ok(export_rows(&entries, &staff))
    }

    /// The week's entries plus each rostered person's entries on the days
    /// just outside it, which overnight shifts can reach.
    fn entries_around(
        &self,
        week: &WeekAnchor,
        staff: &[Staff],
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let mut by_id: BTreeMap<EntryId, ScheduleEntry> = self
            .store
            .list_entries(week)?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();
        for person in staff {
            for edge in [week.monday(), week.sunday()] {
                for e in self.store.list_entries_for_staff_near(&person.id, edge)? {
                    by_id.entry(e.id).or_insert(e);
                }
            }
        }
        Ok(by_id.into_values().collect())
    }

    /// Inserts entries in order; on failure removes the ones already inserted.
    fn insert_all(&self, entries: Vec<NewEntry>) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.store.insert_entry(entry.clone()) {
                Ok(id) => created.push(entry.with_id(id)),
                Err(e) => {
                    warn!(error = %e, inserted = created.len(), "insert failed, rolling back run");
                    self.rollback(&created);
                    return Err(e.into());
                }
            }
        }
        Ok(created)
    }

    fn rollback(&self, created: &[ScheduleEntry]) {
        for entry in created.iter().rev() {
            if let Err(e) = self.store.delete_entry(entry.id) {
                warn!(id = %entry.id, error = %e, "rollback delete failed");
            }
        }
    }
}

/// The week plus the following one when a Sunday seat runs past midnight.
fn weeks_reached(week: WeekAnchor, branches: &[Branch]) -> Vec<WeekAnchor> {
    let sunday = week.sunday();
    let mut weeks = vec![week];
    weeks.extend(
        branches
            .iter()
            .flat_map(|b| &b.coverage)
            .filter(|r| r.weekday == Weekday::Sun && r.required > 0)
            .filter_map(|r| ShiftInterval::new(sunday, r.start_time, r.end_time))
            .flat_map(|interval| interval.weeks()),
    );
    weeks
}
