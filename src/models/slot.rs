//! Derived demand: shift slots and unit-demand tokens.
//!
//! Slots are a computation artifact, rebuilt on every auto-assign run and
//! never persisted.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::{ShiftInterval, ShiftType};

/// Required headcount for one (branch, date, shift type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// Branch the seats belong to.
    pub branch_id: String,
    /// Date the shift starts on.
    pub date: NaiveDate,
    /// Shift type of the seats.
    pub shift_type: ShiftType,
    /// Canonical start time-of-day.
    pub start_time: NaiveTime,
    /// Canonical end time-of-day.
    pub end_time: NaiveTime,
    /// Seats required.
    pub required_count: u32,
}

/// One seat of a [`ShiftSlot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandToken {
    /// Branch the seat belongs to.
    pub branch_id: String,
    /// Date the shift starts on.
    pub date: NaiveDate,
    /// Shift type of the seat.
    pub shift_type: ShiftType,
    /// Canonical start time-of-day.
    pub start_time: NaiveTime,
    /// Canonical end time-of-day.
    pub end_time: NaiveTime,
    /// Seat index within the slot (0-based).
    pub index: u32,
}

/// A seat auto-assign could not fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnfilledSlot {
    /// Branch of the seat.
    pub branch_id: String,
    /// Date of the seat.
    pub date: NaiveDate,
    /// Shift type of the seat.
    pub shift_type: ShiftType,
}

/// Identity of a slot: (branch, date, shift type).
pub type SlotKey = (String, NaiveDate, ShiftType);

impl ShiftSlot {
    /// Slot identity.
    pub fn key(&self) -> SlotKey {
        (self.branch_id.clone(), self.date, self.shift_type)
    }

    /// Weekday of the slot.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Expands the slot into `required_count` tokens, index ascending.
    pub fn tokens(&self) -> impl Iterator<Item = DemandToken> + '_ {
        (0..self.required_count).map(move |index| DemandToken {
            branch_id: self.branch_id.clone(),
            date: self.date,
            shift_type: self.shift_type,
            start_time: self.start_time,
            end_time: self.end_time,
            index,
        })
    }
}

impl DemandToken {
    /// Slot identity.
    pub fn key(&self) -> SlotKey {
        (self.branch_id.clone(), self.date, self.shift_type)
    }

    /// Absolute interval of the seat.
    pub fn interval(&self) -> Option<ShiftInterval> {
        ShiftInterval::new(self.date, self.start_time, self.end_time)
    }

    /// Report form of this seat.
    pub fn to_unfilled(&self) -> UnfilledSlot {
        UnfilledSlot {
            branch_id: self.branch_id.clone(),
            date: self.date,
            shift_type: self.shift_type,
        }
    }
}
