use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use confsync_cli::config::{AppConfig, ConfigManager, get_config};
use confsync_cli::history::{self, HistoryCommand};
use confsync_cli::logging;
use confsync_cli::orchestrators::sync_orchestrator::SyncOrchestrator;
use confsync_core::RunContext;
use std::backtrace::{Backtrace, BacktraceStatus};

#[derive(Parser)]
#[command(name = "confsync")]
#[command(author, version, about = "Configuration sync between two monitoring tenants", long_about = None)]
struct Cli {
    /// Enable debug logging (non-sync commands; sync always logs debug to its main log)
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract both tenants, plan and apply all configuration (the default)
    Sync,

    /// Inspect previous runs
    History(HistoryCommand),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., backend.base_url)
        key: String,
    },

    /// List all configuration values
    List,

    /// Show the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let config = get_config().context("Failed to load configuration")?;
            run_sync(&config).await?;
        }
        Commands::History(command) => {
            logging::init_console_logging(cli.debug);
            let config = get_config().context("Failed to load configuration")?;
            history::execute(command, &config)?;
        }
        Commands::Config { command } => {
            logging::init_console_logging(cli.debug);
            config_command(command)?;
        }
    }

    Ok(())
}

/// Run one sync; failures end up in the main log and the process still exits 0
async fn run_sync(config: &AppConfig) -> Result<()> {
    let run = RunContext::new(&config.paths.log_dir);
    println!("Watch logs here: {}", run.main_log_path().display());
    logging::init_run_logging(&run)?;

    let outcome = match SyncOrchestrator::from_env(config, run) {
        Ok(orchestrator) => orchestrator.run().await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => {
            println!(
                "{} {}",
                "Sync completed:".green().bold(),
                report.run_id.as_str()
            );
        }
        Err(e) => {
            log::error!("An error occurred: {e}");
            log::debug!("{e:#}\nStack backtrace:\n{}", error_backtrace(&e));
            eprintln!("{} {e}", "Sync failed:".red().bold());
        }
    }

    Ok(())
}

/// The error's own backtrace when one was captured, else one taken here
fn error_backtrace(error: &anyhow::Error) -> String {
    match error.backtrace().status() {
        BacktraceStatus::Captured => error.backtrace().to_string(),
        _ => Backtrace::force_capture().to_string(),
    }
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            println!("{}", manager.get(&key)?);
        }
        ConfigCommand::List => {
            for (key, value) in manager.list()? {
                println!("{} = {}", key.cyan(), value);
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}
