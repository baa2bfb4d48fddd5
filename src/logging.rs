//! Logging setup for `medhist`.
//!
//! Diagnostics always go to stderr so `--json` output on stdout stays
//! clean. An optional log file receives a second, ANSI-free copy.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::{MedHistError, Result};

/// Map `-q`/`-v` flags to a default filter directive.
#[must_use]
pub const fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
///
/// # Errors
///
/// Returns `Io` if the log file cannot be opened, or `Config` if a global
/// subscriber is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)));

    let stderr_layer = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .try_init()
        .map_err(|e| MedHistError::Config(format!("logging already initialized: {e}")))
}

/// Install a test-friendly subscriber; repeated calls are ignored.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
