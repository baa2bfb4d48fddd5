//! Command-line interface for `medhist`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::{CliOverrides, Config};
use crate::logging;

/// `medhist` - Past medical history form.
#[derive(Parser, Debug)]
#[command(name = "medhist")]
#[command(
    author,
    version,
    about = "Past medical history form with JSON export/import",
    long_about = None,
    after_help = "Records live in memory only; use `save` in a session (or `export`) to keep them."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to load on top of the user and workspace configs
    #[arg(long, global = true, env = "MEDHIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run (default: session)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive history form
    Session(SessionArgs),

    /// List the active conditions of a saved file (or of the seed list)
    List(ListArgs),

    /// Write a medical-history-<date>.json export
    Export(ExportArgs),

    /// Validate a saved file without loading it
    Check(CheckArgs),

    /// Print the JSON Schema of saved files
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Load this saved file before the first prompt
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Start with no conditions instead of the seed list
    #[arg(long, conflicts_with = "load")]
    pub empty: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Saved file to read (default: the seed list)
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Export the active entries of this saved file instead of the seed list
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Directory to write into (default: config export_dir, else .)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Saved file to validate
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        config_path: cli.config.clone(),
    };
    let config = Config::load(&overrides)?;

    logging::init_logging(
        cli.verbose,
        cli.quiet,
        config.log_file.as_deref(),
        config.log_json(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    match cli.command {
        Some(Commands::Session(args)) => {
            commands::session::execute(&args, &config, std::io::stdin().is_terminal())?;
        }
        None => {
            commands::session::execute(
                &SessionArgs::default(),
                &config,
                std::io::stdin().is_terminal(),
            )?;
        }
        Some(Commands::List(args)) => commands::list::execute(&args, cli.json, &config)?,
        Some(Commands::Export(args)) => commands::export::execute(&args, cli.json, &config)?,
        Some(Commands::Check(args)) => {
            if !commands::check::execute(&args, cli.json)? {
                anyhow::bail!("{} failed validation", args.file.display());
            }
        }
        Some(Commands::Schema) => commands::schema::execute()?,
        Some(Commands::Completions(args)) => commands::completions::execute(args.shell),
    }

    Ok(())
}
