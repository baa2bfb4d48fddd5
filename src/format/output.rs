use std::path::PathBuf;

use medhist_lib::ConditionEntry;
use serde::{Deserialize, Serialize};

/// Visible rows plus the displayed count (list views).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListing {
    pub active_count: i64,
    pub entries: Vec<ConditionEntry>,
}

/// Result of writing an export file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: PathBuf,
    pub entries: usize,
    pub active_count: i64,
}
