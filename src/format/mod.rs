//! Output formatting for `medhist`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! JSON goes to stdout with diagnostics on stderr.
//!
//! # JSON Output Types
//!
//! - [`EntryListing`] - Active rows with the displayed count (list)
//! - [`ExportResult`] - Path and size of a written export (export)

mod output;
mod text;

pub use output::{EntryListing, ExportResult};
pub use text::{
    ColumnWidths, UNNAMED, format_entry_line, format_status_icon, format_table, pad_display,
};
