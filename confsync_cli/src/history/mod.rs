//! History commands
//!
//! Inspect the on-disk record of previous sync runs.

use crate::config::AppConfig;
use crate::orchestrators::history_orchestrator::{self, HistoryOrchestrator, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// History commands for previous runs
#[derive(Debug, Args)]
pub struct HistoryCommand {
    #[command(subcommand)]
    pub command: HistorySubcommand,
}

/// History subcommands
#[derive(Debug, Subcommand)]
pub enum HistorySubcommand {
    /// List recorded runs of the environment's tenant pair, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the history index
    Index,

    /// Count files per immediate subdirectory of a directory
    Count {
        /// Directory to inspect
        path: PathBuf,
    },
}

/// Execute a history command
pub fn execute(command: HistoryCommand, config: &AppConfig) -> Result<()> {
    match command.command {
        HistorySubcommand::List { json } => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            };
            HistoryOrchestrator::from_env(config)?.list(format)
        }
        HistorySubcommand::Index => HistoryOrchestrator::from_env(config)?.index(),
        HistorySubcommand::Count { path } => history_orchestrator::count(&path),
    }
}
