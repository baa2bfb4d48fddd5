//! Core data types for medhist-lib.
//!
//! Field names match the JSON written by the history form, so saved files
//! are interchangeable.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const fn default_active() -> bool {
    true
}

/// Whether the patient has had the condition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
pub enum Status {
    Yes,
    #[default]
    No,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    #[must_use]
    pub const fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::error::MedHistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(Self::Yes),
            "no" | "n" => Ok(Self::No),
            other => Err(crate::error::MedHistError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// A single tracked condition in the past history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConditionEntry {
    /// Unique within the store; never reused in a session.
    pub id: u64,

    /// Condition name (free text, may be empty).
    #[serde(default)]
    pub name: String,

    pub status: Status,

    /// Onset, free text such as "2018" (not validated as a date).
    #[serde(default)]
    pub since: String,

    #[serde(default)]
    pub notes: String,

    /// `false` means soft-deleted: hidden and left out of exports.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ConditionEntry {
    /// A blank, active entry as created by the "add" action.
    #[must_use]
    pub fn blank(id: u64) -> Self {
        Self {
            id,
            name: String::new(),
            status: Status::No,
            since: String::new(),
            notes: String::new(),
            active: true,
        }
    }
}

/// The JSON envelope written on export and read back on import.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SavedDocument {
    /// ISO-8601 export time.
    #[serde(default)]
    pub timestamp: String,

    /// Active count shown by the form when the file was written.
    #[serde(rename = "activeCount")]
    pub active_count: i64,

    /// Active entries in display order.
    #[serde(alias = "diseases")]
    pub entries: Vec<ConditionEntry>,
}

impl SavedDocument {
    /// Number of entries in the document that are flagged active.
    #[must_use]
    pub fn counted_active(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }
}

/// One row of a seed list, before ids are assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedCondition {
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub since: String,
    #[serde(default)]
    pub notes: String,
}

impl SeedCondition {
    #[must_use]
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            status,
            since: String::new(),
            notes: String::new(),
        }
    }

    /// Turn the seed row into an active entry with the given id.
    #[must_use]
    pub fn into_entry(self, id: u64) -> ConditionEntry {
        ConditionEntry {
            id,
            name: self.name,
            status: self.status,
            since: self.since,
            notes: self.notes,
            active: true,
        }
    }
}
