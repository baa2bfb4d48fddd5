//! Text formatting functions for `medhist`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (● yes, ○ no)
//! - Column padding by display width, so wide characters line up
//! - Entry rows and the history table

use medhist_lib::{ConditionEntry, Status};
use unicode_width::UnicodeWidthStr;

/// Status icon characters.
pub mod icons {
    /// Condition present.
    pub const YES: &str = "●";
    /// Condition absent.
    pub const NO: &str = "○";
}

/// Placeholder shown for an entry whose name is still empty.
pub const UNNAMED: &str = "(unnamed)";

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: &Status) -> &'static str {
    match status {
        Status::Yes => icons::YES,
        Status::No => icons::NO,
    }
}

/// Pad `text` with spaces to `width` terminal columns.
#[must_use]
pub fn pad_display(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    let mut padded = text.to_string();
    padded.push_str(&" ".repeat(width.saturating_sub(used)));
    padded
}

fn display_name(entry: &ConditionEntry) -> &str {
    if entry.name.is_empty() {
        UNNAMED
    } else {
        &entry.name
    }
}

/// Column widths for a set of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    pub id: usize,
    pub name: usize,
    pub since: usize,
}

impl ColumnWidths {
    /// Measure the widest id, name and onset among `entries`.
    #[must_use]
    pub fn measure<'a>(entries: impl IntoIterator<Item = &'a ConditionEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |acc, entry| Self {
            id: acc.id.max(format!("#{}", entry.id).len()),
            name: acc.name.max(UnicodeWidthStr::width(display_name(entry))),
            since: acc.since.max(UnicodeWidthStr::width(entry.since.as_str())),
        })
    }
}

/// Format a single row.
///
/// Format: `{icon} #{id}  {name}  {status}  {since}  {notes}`, trailing
/// whitespace trimmed.
#[must_use]
pub fn format_entry_line(entry: &ConditionEntry, widths: &ColumnWidths) -> String {
    let line = format!(
        "{} {}  {}  {:<3}  {}  {}",
        format_status_icon(&entry.status),
        pad_display(&format!("#{}", entry.id), widths.id),
        pad_display(display_name(entry), widths.name),
        entry.status.as_str(),
        pad_display(&entry.since, widths.since),
        entry.notes,
    );
    line.trim_end().to_string()
}

/// Format the history table: a header with the active count, then one row
/// per entry, or a placeholder when there are none.
#[must_use]
pub fn format_table(entries: &[&ConditionEntry], active_count: i64) -> String {
    let mut out = format!("PAST HISTORY  {active_count} active\n");
    if entries.is_empty() {
        out.push_str("No conditions recorded.\n");
        return out;
    }
    let widths = ColumnWidths::measure(entries.iter().copied());
    for entry in entries {
        let marker = if entry.active { "" } else { "  (removed)" };
        out.push_str(&format_entry_line(entry, &widths));
        out.push_str(marker);
        out.push('\n');
    }
    out
}
