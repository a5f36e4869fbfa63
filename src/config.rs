//! Roster and branch configuration snapshots.
//!
//! The roster and branch coverage are configuration owned outside the
//! engine. [`RosterSnapshot`] loads them from JSON and serves them through
//! [`RosterProvider`].
//!
//! ```json
//! {
//!   "staff": [
//!     { "id": "S1", "name": "Kim", "shift_type": "day", "work_days": ["Mon", "Tue"] }
//!   ],
//!   "branches": [
//!     { "id": "B1", "name": "Main", "coverage": [
//!       { "weekday": "Mon", "shift_type": "day", "required": 1,
//!         "start_time": "10:00:00", "end_time": "18:00:00" }
//!     ] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{Branch, Staff};
use crate::store::RosterProvider;
use crate::validation::{validate_roster, ValidationResult};

/// An immutable roster and branch configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Staff members.
    #[serde(default)]
    pub staff: Vec<Staff>,
    /// Branches with coverage rules.
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl RosterSnapshot {
    /// Creates a snapshot.
    pub fn new(staff: Vec<Staff>, branches: Vec<Branch>) -> Self {
        Self { staff, branches }
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Backend(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&raw)
            .map_err(|e| StoreError::Backend(format!("parsing {}: {e}", path.display())))
    }

    /// Serialises to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Structural checks (see [`validate_roster`]).
    pub fn validate(&self) -> ValidationResult {
        validate_roster(&self.staff, &self.branches)
    }
}

impl RosterProvider for RosterSnapshot {
    fn list_staff(&self) -> Result<Vec<Staff>, StoreError> {
        Ok(self.staff.clone())
    }

    fn list_branches(&self) -> Result<Vec<Branch>, StoreError> {
        Ok(self.branches.clone())
    }
}
