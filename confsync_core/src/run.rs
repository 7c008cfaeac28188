//! Run identity and artifact naming
//!
//! A [`RunContext`] is created once, before the first backend call, and is
//! read-only afterwards. Every log file and phase artifact of a run is named
//! through it so the whole run shares one prefix.

use crate::error::{IoError, Result, ValidationError};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// `strftime` layout of a run identifier, e.g. `2024-03-13_10-30-15`
pub const RUN_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Timestamp-derived identifier of a single sync invocation
///
/// Doubles as the backend `action_id`. The format sorts lexicographically in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Identifier for a run starting now (local time)
    pub fn now() -> Self {
        Self(Local::now().format(RUN_ID_FORMAT).to_string())
    }

    /// Parse and validate an existing identifier
    pub fn parse(value: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(value, RUN_ID_FORMAT).map_err(|e| {
            ValidationError::invalid_argument("run_id", &format!("'{value}': {e}"))
        })?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit per-run context handed to everything that logs or writes files
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: RunId,
    log_dir: PathBuf,
}

impl RunContext {
    /// Start a new run that writes its files under `log_dir`
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self::with_run_id(RunId::now(), log_dir)
    }

    /// Build a context around a known run id
    pub fn with_run_id(run_id: RunId, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_id,
            log_dir: log_dir.into(),
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// The main log file receiving every log record of the run
    pub fn main_log_path(&self) -> PathBuf {
        self.artifact_path("main")
    }

    /// `<log_dir>/<run-id>-<suffix>.log`
    pub fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.log_dir.join(format!("{}-{suffix}.log", self.run_id))
    }

    /// `<log_dir>/<run-id>-<endpoint>-ERROR.log`
    pub fn error_artifact_path(&self, endpoint: &str) -> PathBuf {
        self.artifact_path(&format!("{endpoint}-ERROR"))
    }

    /// Make sure the log directory exists
    pub fn ensure_log_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.log_dir).map_err(IoError::at(&self.log_dir))?;
        Ok(())
    }

    /// Persist a phase result as pretty-printed JSON
    pub fn write_artifact(&self, suffix: &str, content: &serde_json::Value) -> Result<PathBuf> {
        let path = self.artifact_path(suffix);
        let text = serde_json::to_string_pretty(content).unwrap_or_else(|_| content.to_string());
        self.write_file(&path, &text)?;
        Ok(path)
    }

    /// Persist a raw response body of a failed phase
    pub fn write_error_artifact(&self, endpoint: &str, body: &str) -> Result<PathBuf> {
        let path = self.error_artifact_path(endpoint);
        self.write_file(&path, body)?;
        Ok(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.ensure_log_dir()?;
        fs::write(path, content).map_err(IoError::at(path))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}
