//! Export command implementation.

use chrono::Utc;
use medhist_lib::RecordStore;
use medhist_lib::document::{read_document, write_export};

use crate::cli::ExportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::ExportResult;

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the source file cannot be read or the export cannot
/// be written.
pub fn execute(args: &ExportArgs, json: bool, config: &Config) -> Result<()> {
    let store = match &args.from {
        Some(path) => {
            let mut store = RecordStore::new();
            store.replace_with(read_document(path)?);
            store
        }
        None => config.seed_store(),
    };

    let dir = args.out.clone().unwrap_or_else(|| config.export_dir());
    let path = write_export(&store, &dir, Utc::now())?;
    let path = dunce::canonicalize(&path).unwrap_or(path);

    let result = ExportResult {
        path,
        entries: store.active_entries().count(),
        active_count: store.active_count(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Saved {} entries ({} active) to {}",
            result.entries,
            result.active_count,
            result.path.display()
        );
    }

    Ok(())
}
