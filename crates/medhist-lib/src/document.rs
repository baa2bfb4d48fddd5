//! Saved-document export and import.
//!
//! Export wraps the active entries in a [`SavedDocument`] and writes it as
//! pretty JSON. Import parses a whole file before touching the store, so a
//! rejected file never leaves partial state behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{MedHistError, Result};
use crate::model::SavedDocument;
use crate::store::RecordStore;
use crate::util::{export_file_name, iso_timestamp};

// ============================================================================
// Export
// ============================================================================

/// Build the export envelope for the store at the given moment.
#[must_use]
pub fn export_document(store: &RecordStore, at: DateTime<Utc>) -> SavedDocument {
    SavedDocument {
        timestamp: iso_timestamp(at),
        active_count: store.active_count(),
        entries: store.active_entries().cloned().collect(),
    }
}

/// Render a document as pretty JSON (2-space indent) with a trailing newline.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn to_json_pretty(document: &SavedDocument) -> Result<String> {
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    Ok(json)
}

/// Export the store into `dir` as `medical-history-<date>.json`.
///
/// Writes to a temporary sibling first and renames it into place.
///
/// # Errors
///
/// Returns `Io` if the directory is missing or the file cannot be written.
pub fn write_export(store: &RecordStore, dir: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
    let document = export_document(store, at);
    let json = to_json_pretty(&document)?;

    let path = dir.join(export_file_name(at));
    let tmp_path = path.with_extension("json.tmp");

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, &path)?;

    info!(
        path = %path.display(),
        entries = document.entries.len(),
        active_count = document.active_count,
        "Exported medical history"
    );
    Ok(path)
}

// ============================================================================
// Import
// ============================================================================

/// Parse the text of a saved document.
///
/// # Errors
///
/// Returns `DocumentParse` if the text is not JSON or lacks the expected
/// shape, or `Validation` if an entry uses id `u64::MAX` (no id would be
/// left for the next `add`).
pub fn parse_document(text: &str) -> Result<SavedDocument> {
    let document: SavedDocument =
        serde_json::from_str(text).map_err(|e| MedHistError::document_parse(&e))?;
    if document.entries.iter().any(|e| e.id == u64::MAX) {
        return Err(MedHistError::validation(
            "id",
            format!("entry id {} is reserved", u64::MAX),
        ));
    }
    Ok(document)
}

/// Read and parse a saved document from disk.
///
/// # Errors
///
/// Returns `FileNotFound` if the path does not exist, `Io` on other read
/// failures, or `DocumentParse` if the content is malformed.
pub fn read_document(path: &Path) -> Result<SavedDocument> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MedHistError::FileNotFound(path.to_path_buf())
        } else {
            MedHistError::Io(e)
        }
    })?;
    parse_document(&text)
}

/// Phase of an import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportPhase {
    #[default]
    Idle,
    Reading,
}

/// What a successful import put into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub entries: usize,
    pub active_count: i64,
}

/// How the most recent import attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The document replaced the store.
    Applied(ImportSummary),
    /// The file was rejected; the store is unchanged.
    Rejected { reason: String },
}

/// Drives `Idle -> Reading -> {Applied | Rejected} -> Idle`.
///
/// Each attempt is independent; importing the same path again is always
/// allowed.
#[derive(Debug, Default)]
pub struct Importer {
    phase: ImportPhase,
    last_outcome: Option<ImportOutcome>,
}

impl Importer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> ImportPhase {
        self.phase
    }

    #[must_use]
    pub const fn last_outcome(&self) -> Option<&ImportOutcome> {
        self.last_outcome.as_ref()
    }

    /// Import `path` into `store`, replacing it wholesale on success.
    ///
    /// # Errors
    ///
    /// Returns the read or parse error; the store is left untouched.
    pub fn import_file(&mut self, store: &mut RecordStore, path: &Path) -> Result<ImportSummary> {
        self.phase = ImportPhase::Reading;
        debug!(path = %path.display(), "Reading import file");
        let result = read_document(path);
        self.phase = ImportPhase::Idle;
        self.finish(store, result)
    }

    /// Import already-read document text into `store`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentParse` if the text is malformed; the store is left
    /// untouched.
    pub fn import_text(&mut self, store: &mut RecordStore, text: &str) -> Result<ImportSummary> {
        self.phase = ImportPhase::Reading;
        let result = parse_document(text);
        self.phase = ImportPhase::Idle;
        self.finish(store, result)
    }

    fn finish(
        &mut self,
        store: &mut RecordStore,
        result: Result<SavedDocument>,
    ) -> Result<ImportSummary> {
        match result {
            Ok(document) => {
                let counted = document.counted_active();
                if i64::try_from(counted).ok() != Some(document.active_count) {
                    warn!(
                        declared = document.active_count,
                        counted, "activeCount disagrees with active entries; using declared value"
                    );
                }
                let summary = ImportSummary {
                    entries: document.entries.len(),
                    active_count: document.active_count,
                };
                store.replace_with(document);
                self.last_outcome = Some(ImportOutcome::Applied(summary));
                Ok(summary)
            }
            Err(err) => {
                warn!(error = %err, "Import rejected; keeping current records");
                self.last_outcome = Some(ImportOutcome::Rejected {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }
}
