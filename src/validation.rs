//! Roster and branch configuration checks.
//!
//! Run before every auto-assign so structural problems surface as one
//! error up front instead of as odd assignments. Detects:
//! - Duplicate or empty staff and branch IDs
//! - Zero-length coverage windows
//! - Two coverage rules for the same (weekday, shift type) in one branch

use std::collections::HashSet;

use crate::models::{Branch, Staff};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity has an empty ID.
    EmptyId,
    /// A coverage rule starts and ends at the same time-of-day.
    ZeroLengthWindow,
    /// A branch declares the same (weekday, shift type) more than once.
    DuplicateCoverage,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a roster snapshot and branch configuration.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_roster(staff: &[Staff], branches: &[Branch]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut staff_ids = HashSet::new();
    for s in staff {
        if s.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Staff '{}' has an empty ID", s.name),
            ));
        }
        if !staff_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate staff ID: {}", s.id),
            ));
        }
    }

    let mut branch_ids = HashSet::new();
    for b in branches {
        if b.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Branch '{}' has an empty ID", b.name),
            ));
        }
        if !branch_ids.insert(b.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate branch ID: {}", b.id),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &b.coverage {
            if rule.start_time == rule.end_time {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ZeroLengthWindow,
                    format!(
                        "Branch '{}' {} {} shift starts and ends at {}",
                        b.id, rule.weekday, rule.shift_type, rule.start_time
                    ),
                ));
            }
            if !seen.insert((rule.weekday, rule.shift_type)) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateCoverage,
                    format!(
                        "Branch '{}' declares {} {} coverage twice",
                        b.id, rule.weekday, rule.shift_type
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
