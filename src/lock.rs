//! Per-week mutual exclusion.
//!
//! Manual create, manual delete and auto-assign all read-then-write one
//! week's entries. Operations on the same week (same Monday) run one at a
//! time; operations on different weeks never wait on each other.
//!
//! The manager tracks the set of held weeks under one short-lived mutex and
//! parks waiters on a condition variable. A week's key exists only while
//! someone holds it, so the set does not grow with history.
//!
//! An operation whose shifts reach into the following week (a Sunday
//! overnight) holds both weeks. Multi-week holders always acquire in
//! ascending Monday order, so two of them cannot wait on each other.

use std::collections::{BTreeSet, HashSet};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::models::WeekAnchor;

/// Keyed lock over scheduling weeks.
#[derive(Debug, Default)]
pub struct WeekLockManager {
    held: Mutex<HashSet<WeekAnchor>>,
    released: Condvar,
}

/// Exclusive access to one week. Released on drop.
#[derive(Debug)]
#[must_use = "the week is unlocked as soon as the guard is dropped"]
pub struct WeekGuard<'a> {
    manager: &'a WeekLockManager,
    week: WeekAnchor,
}

impl WeekLockManager {
    /// Creates a manager with no weeks held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until `week` is free, then holds it.
    pub fn lock(&self, week: WeekAnchor) -> WeekGuard<'_> {
        let mut held = self.held_set();
        while held.contains(&week) {
            trace!(week = %week, "waiting for week lock");
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(week);
        trace!(week = %week, "week lock acquired");
        WeekGuard { manager: self, week }
    }

    /// Blocks until every week in `weeks` is held, acquiring them in
    /// ascending Monday order. Duplicates are held once.
    pub fn lock_all(&self, weeks: impl IntoIterator<Item = WeekAnchor>) -> Vec<WeekGuard<'_>> {
        let ordered: BTreeSet<WeekAnchor> = weeks.into_iter().collect();
        ordered.into_iter().map(|week| self.lock(week)).collect()
    }

    /// Holds `week` if it is free, without blocking.
    pub fn try_lock(&self, week: WeekAnchor) -> Option<WeekGuard<'_>> {
        let mut held = self.held_set();
        if !held.insert(week) {
            return None;
        }
        Some(WeekGuard { manager: self, week })
    }

    /// Whether `week` is currently held.
    pub fn is_locked(&self, week: WeekAnchor) -> bool {
        self.held_set().contains(&week)
    }

    // Only insert/remove touch the set, so a poisoned lock still holds a
    // consistent set.
    fn held_set(&self) -> MutexGuard<'_, HashSet<WeekAnchor>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, week: WeekAnchor) {
        self.held_set().remove(&week);
        self.released.notify_all();
        trace!(week = %week, "week lock released");
    }
}

impl WeekGuard<'_> {
    /// The held week.
    pub fn week(&self) -> WeekAnchor {
        self.week
    }
}

impl Drop for WeekGuard<'_> {
    fn drop(&mut self) {
        self.manager.release(self.week);
    }
}
