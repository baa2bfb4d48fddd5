//! Error types for `medhist-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for medhist-lib operations.
#[derive(Error, Debug)]
pub enum MedHistError {
    // === Entry Errors ===
    /// Entry with the specified ID was not found.
    #[error("Entry not found: #{id}")]
    EntryNotFound { id: u64 },

    /// Invalid status value (expected yes or no).
    #[error("Invalid status: {status} (expected Yes or No)")]
    InvalidStatus { status: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Document Errors ===
    /// The import file is not a well-formed saved document.
    #[error("Document parse error at line {line}, column {column}: {reason}")]
    DocumentParse {
        line: usize,
        column: usize,
        reason: String,
    },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MedHistError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a `serde_json` error raised while reading a document.
    #[must_use]
    pub fn document_parse(err: &serde_json::Error) -> Self {
        Self::DocumentParse {
            line: err.line(),
            column: err.column(),
            reason: err.to_string(),
        }
    }

    /// True for errors caused by the content of an import file rather than
    /// by the file system.
    #[must_use]
    pub const fn is_malformed_document(&self) -> bool {
        matches!(self, Self::DocumentParse { .. })
    }
}

/// Result type using `MedHistError`.
pub type Result<T> = std::result::Result<T, MedHistError>;
