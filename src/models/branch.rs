//! Branch coverage configuration.
//!
//! A branch declares, per weekday and shift type, how many seats must be
//! staffed and the canonical time window of that shift. Coverage is owned
//! by configuration and read-only to the engine.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::ShiftType;

/// Default day shift window (10:00-18:00).
pub const DEFAULT_DAY_WINDOW: (u32, u32) = (10, 18);
/// Default night shift window (18:00-02:00 next day).
pub const DEFAULT_NIGHT_WINDOW: (u32, u32) = (18, 2);

/// Weekdays in fill order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A branch (work site).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique branch identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Coverage requirements.
    #[serde(default)]
    pub coverage: Vec<CoverageRule>,
}

/// Required headcount and canonical window for one (weekday, shift type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRule {
    /// Weekday the rule applies to.
    pub weekday: Weekday,
    /// Shift type of the seats.
    pub shift_type: ShiftType,
    /// Seats to fill (0 = no demand).
    pub required: u32,
    /// Canonical start time-of-day.
    pub start_time: NaiveTime,
    /// Canonical end time-of-day (at or before start = next day).
    pub end_time: NaiveTime,
}

impl CoverageRule {
    /// Creates a rule with an explicit window.
    pub fn new(
        weekday: Weekday,
        shift_type: ShiftType,
        required: u32,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            weekday,
            shift_type,
            required,
            start_time,
            end_time,
        }
    }

    /// Creates a rule using the default window for `shift_type`.
    pub fn with_default_window(weekday: Weekday, shift_type: ShiftType, required: u32) -> Self {
        let (start, end) = match shift_type {
            ShiftType::Day => DEFAULT_DAY_WINDOW,
            ShiftType::Night => DEFAULT_NIGHT_WINDOW,
        };
        Self::new(weekday, shift_type, required, hour(start), hour(end))
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl Branch {
    /// Creates a branch without coverage.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            coverage: Vec::new(),
        }
    }

    /// Sets the branch name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a coverage rule.
    pub fn with_rule(mut self, rule: CoverageRule) -> Self {
        self.coverage.push(rule);
        self
    }

    /// Requires `required` seats of `shift_type` on each listed weekday,
    /// using the default window.
    pub fn with_coverage(
        mut self,
        weekdays: impl IntoIterator<Item = Weekday>,
        shift_type: ShiftType,
        required: u32,
    ) -> Self {
        for weekday in weekdays {
            self.coverage
                .push(CoverageRule::with_default_window(weekday, shift_type, required));
        }
        self
    }

    /// The rule for a (weekday, shift type), if configured.
    pub fn rule_for(&self, weekday: Weekday, shift_type: ShiftType) -> Option<&CoverageRule> {
        self.coverage
            .iter()
            .find(|r| r.weekday == weekday && r.shift_type == shift_type)
    }

    /// The shift type whose canonical window on `weekday` is exactly
    /// `start_time..end_time`.
    ///
    /// When Day and Night share the same window, `preferred` picks between
    /// them; without a match on `preferred` the first matching rule wins.
    pub fn shift_type_of_window(
        &self,
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        preferred: Option<ShiftType>,
    ) -> Option<ShiftType> {
        let mut matching = self
            .coverage
            .iter()
            .filter(|r| r.weekday == weekday && r.start_time == start_time && r.end_time == end_time)
            .map(|r| r.shift_type);
        let first = matching.next()?;
        if Some(first) == preferred {
            return Some(first);
        }
        Some(matching.find(|t| Some(*t) == preferred).unwrap_or(first))
    }

    /// Total seats required over a week.
    pub fn weekly_seats(&self) -> u32 {
        self.coverage.iter().map(|r| r.required).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_builder() {
        let b = Branch::new("B1")
            .with_name("Gangnam")
            .with_coverage(WEEKDAYS[..5].iter().copied(), ShiftType::Day, 1)
            .with_coverage([Weekday::Sat], ShiftType::Night, 2);

        assert_eq!(b.name, "Gangnam");
        assert_eq!(b.coverage.len(), 6);
        assert_eq!(b.weekly_seats(), 7);
        assert!(b.rule_for(Weekday::Mon, ShiftType::Day).is_some());
        assert!(b.rule_for(Weekday::Sun, ShiftType::Day).is_none());
    }

    #[test]
    fn test_default_windows() {
        let day = CoverageRule::with_default_window(Weekday::Mon, ShiftType::Day, 1);
        assert_eq!(day.start_time, hour(10));
        assert_eq!(day.end_time, hour(18));

        let night = CoverageRule::with_default_window(Weekday::Mon, ShiftType::Night, 1);
        assert_eq!(night.start_time, hour(18));
        assert_eq!(night.end_time, hour(2));
    }

    #[test]
    fn test_shift_type_of_window() {
        let b = Branch::new("B1")
            .with_coverage([Weekday::Mon], ShiftType::Day, 1)
            .with_coverage([Weekday::Mon], ShiftType::Night, 1);

        assert_eq!(
            b.shift_type_of_window(Weekday::Mon, hour(18), hour(2), None),
            Some(ShiftType::Night)
        );
        // The window decides even when the preference disagrees.
        assert_eq!(
            b.shift_type_of_window(Weekday::Mon, hour(18), hour(2), Some(ShiftType::Day)),
            Some(ShiftType::Night)
        );
        assert_eq!(b.shift_type_of_window(Weekday::Mon, hour(9), hour(17), None), None);
        assert_eq!(b.shift_type_of_window(Weekday::Tue, hour(10), hour(18), None), None);
    }

    #[test]
    fn test_shared_window_uses_preference() {
        let b = Branch::new("B1")
            .with_rule(CoverageRule::new(Weekday::Mon, ShiftType::Day, 1, hour(9), hour(21)))
            .with_rule(CoverageRule::new(Weekday::Mon, ShiftType::Night, 1, hour(9), hour(21)));

        assert_eq!(
            b.shift_type_of_window(Weekday::Mon, hour(9), hour(21), Some(ShiftType::Night)),
            Some(ShiftType::Night)
        );
        assert_eq!(
            b.shift_type_of_window(Weekday::Mon, hour(9), hour(21), Some(ShiftType::Day)),
            Some(ShiftType::Day)
        );
        assert_eq!(
            b.shift_type_of_window(Weekday::Mon, hour(9), hour(21), None),
            Some(ShiftType::Day)
        );
    }
}
