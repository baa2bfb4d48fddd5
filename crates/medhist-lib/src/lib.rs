//! `medhist-lib`: in-process past medical history records.
//!
//! Holds a patient's condition list in memory and moves it in and out of
//! saved JSON documents. Nothing is persisted except by an explicit export.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use chrono::Utc;
//! use medhist_lib::{Importer, RecordStore, Status, document};
//!
//! let mut store = RecordStore::seeded();
//!
//! // Edit
//! let id = store.add().unwrap();
//! store.set_name(id, "Gout");
//! store.set_status(id, Status::Yes);
//! store.remove(3);
//!
//! // Export the active rows
//! let path = document::write_export(&store, Path::new("."), Utc::now()).unwrap();
//!
//! // Load it back, replacing everything
//! let mut importer = Importer::new();
//! importer.import_file(&mut store, &path).unwrap();
//! ```

pub mod document;
pub mod error;
pub mod model;
pub mod store;
pub mod util;

pub use document::{ImportOutcome, ImportPhase, ImportSummary, Importer};
pub use error::{MedHistError, Result};
pub use model::{ConditionEntry, SavedDocument, SeedCondition, Status};
pub use store::RecordStore;
