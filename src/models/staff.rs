//! Staff model.
//!
//! A staff member is the entity that fills shift seats. Each one is
//! permanently typed as a day-shift or night-shift worker; changing the
//! type is a roster administration task, not something the engine does.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Shift eligibility category.
///
/// Ordering is significant: `Day` sorts before `Night`, which is the
/// order slots of the same date are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// Day shift.
    Day,
    /// Night shift.
    Night,
}

impl ShiftType {
    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
        }
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff member on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique staff identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Fixed shift eligibility.
    pub shift_type: ShiftType,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Weekdays this person works. `None` = every day.
    #[serde(default)]
    pub work_days: Option<Vec<Weekday>>,
}

impl Staff {
    /// Creates a staff member of the given shift type.
    pub fn new(id: impl Into<String>, shift_type: ShiftType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            shift_type,
            phone: None,
            work_days: None,
        }
    }

    /// Creates a day-shift staff member.
    pub fn day(id: impl Into<String>) -> Self {
        Self::new(id, ShiftType::Day)
    }

    /// Creates a night-shift staff member.
    pub fn night(id: impl Into<String>) -> Self {
        Self::new(id, ShiftType::Night)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Restricts the weekdays this person works.
    pub fn with_work_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.work_days = Some(days.into_iter().collect());
        self
    }

    /// Whether this person works on the given weekday.
    pub fn works_on(&self, weekday: Weekday) -> bool {
        match &self.work_days {
            None => true,
            Some(days) => days.contains(&weekday),
        }
    }

    /// Whether this person can take a seat of `shift_type` on `weekday`.
    pub fn is_eligible(&self, shift_type: ShiftType, weekday: Weekday) -> bool {
        self.shift_type == shift_type && self.works_on(weekday)
    }
}
