//! Session command implementation.

use std::io;

use medhist_lib::RecordStore;
use tracing::info;

use crate::cli::SessionArgs;
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;

/// Execute the session command on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the `--load` file cannot be imported or the terminal
/// cannot be read or written.
pub fn execute(args: &SessionArgs, config: &Config, interactive: bool) -> Result<()> {
    let store = if args.empty {
        RecordStore::new()
    } else {
        config.seed_store()
    };
    let mut session = Session::new(store, config.export_dir()).with_prompt(interactive);

    if let Some(path) = &args.load {
        session.preload(path)?;
    }
    info!(
        entries = session.store().len(),
        export_dir = %config.export_dir().display(),
        "Session started"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    session.run(stdin.lock(), &mut stdout)?;
    Ok(())
}
