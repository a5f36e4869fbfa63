//! Weekly demand calculation.
//!
//! Expands branch coverage rules into the ordered list of seats that must
//! be staffed for one week.
//!
//! # Ordering
//! Branch id ascending, then Monday → Sunday, then day before night, then
//! seat index ascending. The assignment engine fills seats in exactly this
//! order, so the order is part of the determinism contract.

use crate::error::ScheduleError;
use crate::models::{Branch, DemandToken, ShiftSlot, ShiftType, WeekAnchor, WEEKDAYS};

const SHIFT_ORDER: [ShiftType; 2] = [ShiftType::Day, ShiftType::Night];

/// Computes the slots with non-zero demand for a week, in fill order.
///
/// When a branch declares the same (weekday, shift type) twice, the first
/// rule wins; roster validation reports the duplicate.
pub fn weekly_slots(week: &WeekAnchor, branches: &[Branch]) -> Vec<ShiftSlot> {
    let mut ordered: Vec<&Branch> = branches.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut slots = Vec::new();
    for branch in ordered {
        for (offset, &weekday) in WEEKDAYS.iter().enumerate() {
            let date = week.day(offset as u32);
            for shift_type in SHIFT_ORDER {
                let Some(rule) = branch.rule_for(weekday, shift_type) else {
                    continue;
                };
                if rule.required == 0 {
                    continue;
                }
                slots.push(ShiftSlot {
                    branch_id: branch.id.clone(),
                    date,
                    shift_type,
                    start_time: rule.start_time,
                    end_time: rule.end_time,
                    required_count: rule.required,
                });
            }
        }
    }
    slots
}

/// Expands slots into unit-demand tokens, preserving slot order.
pub fn expand_tokens(slots: &[ShiftSlot]) -> Vec<DemandToken> {
    slots.iter().flat_map(|s| s.tokens()).collect()
}

/// Parses a week anchor and computes its tokens.
///
/// A malformed or non-Monday anchor yields `InvalidWeekAnchor` and no tokens.
pub fn weekly_demand(anchor: &str, branches: &[Branch]) -> Result<Vec<DemandToken>, ScheduleError> {
    let week = WeekAnchor::parse(anchor)?;
    Ok(expand_tokens(&weekly_slots(&week, branches)))
}
