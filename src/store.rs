//! Schedule store and roster provider boundaries.
//!
//! The engine never owns state. Every operation reads a fresh snapshot
//! through these traits and writes through [`ScheduleStore`]; nothing is
//! cached beyond one locked operation.
//!
//! [`InMemoryStore`] is the reference implementation. It enforces the
//! no-overlap invariant on insert with the same detector the service uses.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::conflict;
use crate::error::StoreError;
use crate::models::{Branch, EntryId, NewEntry, ScheduleEntry, Staff, WeekAnchor};

/// Durable schedule state.
///
/// Implementations must be safe to call from concurrent request handlers.
/// Serialisation of writes per week is the caller's job
/// (see [`WeekLockManager`](crate::lock::WeekLockManager)).
///
/// `insert_entry` must re-check the no-overlap invariant itself and reject
/// a double booking, whatever locks the caller holds.
pub trait ScheduleStore: Send + Sync {
    /// Entries whose work date falls within the week.
    fn list_entries(&self, week: &WeekAnchor) -> Result<Vec<ScheduleEntry>, StoreError>;

    /// Entries of `staff_id` dated within one day of `date`.
    fn list_entries_for_staff_near(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, StoreError>;

    /// Looks up one entry.
    fn get_entry(&self, id: EntryId) -> Result<Option<ScheduleEntry>, StoreError>;

    /// Persists an entry and returns its new identifier.
    ///
    /// Must fail with [`StoreError::Conflict`] if the entry overlaps any
    /// existing entry of the same staff member, across week boundaries too.
    fn insert_entry(&self, entry: NewEntry) -> Result<EntryId, StoreError>;

    /// Removes an entry. Fails with [`StoreError::NotFound`] for unknown ids.
    fn delete_entry(&self, id: EntryId) -> Result<(), StoreError>;
}

/// Read-only roster and branch configuration.
pub trait RosterProvider: Send + Sync {
    /// Current roster snapshot.
    fn list_staff(&self) -> Result<Vec<Staff>, StoreError>;

    /// Current branch configuration snapshot.
    fn list_branches(&self) -> Result<Vec<Branch>, StoreError>;
}

/// In-memory [`ScheduleStore`].
#[derive(Debug)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<EntryId, ScheduleEntry>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    /// Creates an empty store. Identifiers start at 1.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Every entry, ordered by id.
    pub fn all_entries(&self) -> Result<Vec<ScheduleEntry>, StoreError> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<EntryId, ScheduleEntry>>, StoreError> {
        self.entries
            .read()
            .map_err(|_| StoreError::Backend("entry table lock poisoned".into()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<EntryId, ScheduleEntry>>, StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Backend("entry table lock poisoned".into()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleStore for InMemoryStore {
    fn list_entries(&self, week: &WeekAnchor) -> Result<Vec<ScheduleEntry>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|e| week.contains(e.work_date))
            .cloned()
            .collect())
    }

    fn list_entries_for_staff_near(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|e| e.staff_id == staff_id && conflict::is_neighbor_date(date, e.work_date))
            .cloned()
            .collect())
    }

    fn get_entry(&self, id: EntryId) -> Result<Option<ScheduleEntry>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn insert_entry(&self, entry: NewEntry) -> Result<EntryId, StoreError> {
        let interval = entry.interval().ok_or_else(|| {
            StoreError::InvalidEntry(format!(
                "zero-length window {} on {}",
                entry.start_time, entry.work_date
            ))
        })?;

        let mut entries = self.write()?;
        if let Some(existing) = conflict::find_conflict(&entry.staff_id, &interval, entries.values())
        {
            return Err(StoreError::Conflict {
                staff_id: entry.staff_id,
                work_date: entry.work_date,
                existing: existing.id,
            });
        }

        let id = EntryId(self.next_id.fetch_add(1, Ordering::Relaxed));
        entries.insert(id, entry.with_id(id));
        Ok(id)
    }

    fn delete_entry(&self, id: EntryId) -> Result<(), StoreError> {
        self.write()?
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
