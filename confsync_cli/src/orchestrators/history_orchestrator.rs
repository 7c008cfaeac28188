//! History command orchestrator
//!
//! Read-only views over the run history of the tenant pair configured in the
//! environment.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use colored::*;
use confsync_core::history::{self, HistoryEntry, HistoryKind, HistoryStore};
use confsync_core::TenantPair;
use log::debug;
use std::path::Path;

/// Output format for history results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Orchestrator for the history command
pub struct HistoryOrchestrator {
    store: HistoryStore,
}

impl HistoryOrchestrator {
    /// Open the history of the env tenant pair under the configured data dir
    pub fn from_env(config: &AppConfig) -> Result<Self> {
        let tenants = TenantPair::from_env()?;
        Self::for_tenants(config, &tenants)
    }

    /// Open the history of `tenants` under the configured data dir
    pub fn for_tenants(config: &AppConfig, tenants: &TenantPair) -> Result<Self> {
        let store = HistoryStore::resolve_history_root(
            &config.paths.data_dir,
            &tenants.main,
            &tenants.target,
        )
        .context("Failed to prepare the history directory")?;
        debug!("History root: {}", store.root().display());

        Ok(Self { store })
    }

    /// Print all recorded runs, newest first
    pub fn list(&self, format: OutputFormat) -> Result<()> {
        let entries = self.store.list_history_entries()?;
        println!("{}", render_entries(&entries, format)?);
        Ok(())
    }

    /// Print the history index as JSON; `{}` when there is none
    pub fn index(&self) -> Result<()> {
        let index = self.store.load_history_index()?;
        println!("{}", serde_json::to_string_pretty(&index)?);
        Ok(())
    }
}

/// Print `<name> <count>` per immediate subdirectory of `path`
pub fn count(path: &Path) -> Result<()> {
    let counts = history::count_files_per_subdirectory(path)?;
    for (name, files) in counts {
        println!("{name} {files}");
    }
    Ok(())
}

/// Render history entries for display
pub fn render_entries(entries: &[HistoryEntry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
        OutputFormat::Human => {
            if entries.is_empty() {
                return Ok("No recorded runs".yellow().to_string());
            }

            let mut lines = vec![format!(
                "{:<22} {:<14} {}",
                "Run".bold(),
                "Type".bold(),
                "Logs".bold()
            )];
            for entry in entries {
                let label = format!("{:<14}", entry.kind.label());
                let label = match entry.kind {
                    HistoryKind::PlanAll => label.green(),
                    HistoryKind::Targeted => label.cyan(),
                    HistoryKind::PostProcess => label.magenta(),
                };
                lines.push(format!("{:<22} {} {}", entry.name, label, entry.nb_logs));
            }
            Ok(lines.join("\n"))
        }
    }
}
