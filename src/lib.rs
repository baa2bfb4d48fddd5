//! `medhist` - Past medical history form
//!
//! This crate provides the `medhist` CLI on top of `medhist-lib`.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`session`] - The interactive form (one input line per user event)
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - tracing subscriber setup
//!
//! The record store, data model and saved-file format live in
//! [`medhist_lib`].

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod session;

pub use error::{MedHistError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if configuration, logging setup, or the command fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
