//! Logger setup for the two kinds of invocation
//!
//! A sync run sends every record to its main log file. All other commands log
//! to stderr.

use anyhow::{Context, Result};
use chrono::Local;
use confsync_core::RunContext;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;

/// Crates whose records reach the main log at debug level
const WORKSPACE_MODULES: [&str; 3] = ["confsync", "confsync_cli", "confsync_core"];

/// Timestamp layout of main log lines, e.g. `2024-03-13 10:30:15,042`
const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Route all log records of the run to `<log_dir>/<run-id>-main.log`
///
/// Lines read `<timestamp> <LEVEL> <message>`. `RUST_LOG` still overrides the
/// filter.
pub fn init_run_logging(run: &RunContext) -> Result<()> {
    run.ensure_log_dir()
        .context("Failed to create the log directory")?;

    let path = run.main_log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open main log {}", path.display()))?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    for module in WORKSPACE_MODULES {
        builder.filter_module(module, LevelFilter::Debug);
    }
    builder
        .parse_env(env_logger::Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                Local::now().format(LOG_TIMESTAMP_FORMAT),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Logger already initialized")
}

/// Console logging for non-sync commands
pub fn init_console_logging(debug: bool) {
    let result = if debug {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        builder.filter_level(LevelFilter::Debug);
        for module in WORKSPACE_MODULES {
            builder.filter_module(module, LevelFilter::Debug);
        }
        builder.format_timestamp_millis().try_init()
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .try_init()
    };

    if result.is_ok() && debug {
        eprintln!("Debug logging enabled");
    }
}
