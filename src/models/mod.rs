//! Shift scheduling domain models.
//!
//! | Type | Role |
//! |------|------|
//! | `Staff` | Roster member with a fixed shift type |
//! | `Branch` | Work site with per-weekday coverage rules |
//! | `ShiftSlot` / `DemandToken` | Derived demand for one week |
//! | `ScheduleEntry` | Persisted booking (manual or auto) |
//! | `WeekAnchor` | Monday identifying a scheduling week |

mod branch;
mod entry;
mod interval;
mod slot;
mod staff;
mod week;

pub use branch::{Branch, CoverageRule, DEFAULT_DAY_WINDOW, DEFAULT_NIGHT_WINDOW, WEEKDAYS};
pub use entry::{EntryId, EntryOrigin, NewEntry, ScheduleEntry};
pub use interval::ShiftInterval;
pub use slot::{DemandToken, ShiftSlot, SlotKey, UnfilledSlot};
pub use staff::{ShiftType, Staff};
pub use week::{WeekAnchor, ANCHOR_FORMAT};
