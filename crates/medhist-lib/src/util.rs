//! Timestamp and file-name helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// Prefix of every export file name.
pub const EXPORT_FILE_PREFIX: &str = "medical-history-";

/// Format a moment as an ISO-8601 UTC string with millisecond precision,
/// e.g. `2026-10-19T08:30:00.123Z`.
#[must_use]
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Export file name for the UTC date of `at`: `medical-history-YYYY-MM-DD.json`.
#[must_use]
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.json", at.format("%Y-%m-%d"))
}
