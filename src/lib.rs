//! Weekly shift auto-assignment for multi-branch staff rosters.
//!
//! Given a roster of day-shift and night-shift staff, per-branch coverage
//! requirements and supervisor-pinned entries, fills every uncovered seat
//! of a week without double-booking anyone, spreading load evenly and
//! producing the same result every time it runs on the same input.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Staff`, `Branch`, `ShiftSlot`,
//!   `ScheduleEntry`, `WeekAnchor`, `ShiftInterval`
//! - **`demand`**: Expands branch coverage into ordered per-seat demand
//! - **`conflict`**: Overlap detection for a staff member's shifts
//! - **`scheduler`**: The auto-assign engine and weekly load reporting
//! - **`lock`**: Per-week mutual exclusion
//! - **`store`**: Store and roster traits, in-memory store
//! - **`service`**: Request-level operations combining the above
//! - **`config`**: JSON roster/branch snapshots
//! - **`validation`**: Roster integrity checks
//!
//! # Concurrency
//!
//! Operations on the same week are serialized through the week lock;
//! different weeks proceed in parallel. The store is the only shared
//! mutable state.

pub mod config;
pub mod conflict;
pub mod demand;
pub mod error;
pub mod lock;
pub mod models;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{ScheduleError, StoreError};
pub use service::{AutoAssignReport, ManualEntryRequest, ScheduleService};
