//! Schema command implementation.

use medhist_lib::SavedDocument;

use crate::error::Result;

/// Print the JSON Schema of the saved-file format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute() -> Result<()> {
    let schema = schemars::schema_for!(SavedDocument);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
