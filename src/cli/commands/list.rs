//! List command implementation.
//!
//! Shows what a saved file would put on the form: the active rows in
//! order, headed by the file's active count.

use medhist_lib::RecordStore;
use medhist_lib::document::read_document;

use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::{EntryListing, format_table};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn execute(args: &ListArgs, json: bool, config: &Config) -> Result<()> {
    let store = load_store(args, config)?;

    if json {
        let listing = EntryListing {
            active_count: store.active_count(),
            entries: store.active_entries().cloned().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        let rows: Vec<_> = store.active_entries().collect();
        print!("{}", format_table(&rows, store.active_count()));
    }

    Ok(())
}

fn load_store(args: &ListArgs, config: &Config) -> Result<RecordStore> {
    match &args.file {
        Some(path) => {
            let mut store = RecordStore::new();
            store.replace_with(read_document(path)?);
            Ok(store)
        }
        None => Ok(config.seed_store()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use medhist_lib::document::write_export;

    #[test]
    fn test_load_store_defaults_to_seed() {
        let store = load_store(&ListArgs::default(), &Config::default()).unwrap();
        assert_eq!(store.len(), 11);
    }

    #[test]
    fn test_load_store_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = RecordStore::seeded();
        source.remove(1);
        let path = write_export(&source, dir.path(), Utc::now()).unwrap();

        let args = ListArgs { file: Some(path) };
        let store = load_store(&args, &Config::default()).unwrap();
        assert_eq!(store.len(), 10);
        assert_eq!(store.active_count(), 10);
        assert!(store.get(1).is_none());
    }
}
