//! On-disk history of previous runs
//!
//! Every tenant pair gets its own history root:
//!
//! ```text
//! <data_dir>/terraform/<main>__<target>/history/
//! ├── history.json          index, free-form JSON object
//! ├── complete/<action-id>/  logs of full "plan all" runs
//! └── targeted/<action-id>/  logs of runs scoped to selected resources
//! ```
//!
//! Entries are recomputed from the tree on every listing. There is no locking:
//! two writers of the index race and the last one wins.

pub mod index;
pub mod scan;

pub use index::HistoryIndex;
pub use scan::count_files_per_subdirectory;

use crate::error::{IoError, Result, ValidationError};
use crate::tenant::TenantDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Directory under the data dir holding per-pair terraform state
pub const TERRAFORM_DIR: &str = "terraform";
/// Joins the two tenant keys; never produced by `directory_key`
pub const PAIR_SEPARATOR: &str = "__";
/// History directory under a pair's terraform directory
pub const HISTORY_DIR: &str = "history";
/// Index file name under the history root
pub const HISTORY_INDEX_FILE: &str = "history.json";
/// Subtree of complete runs
pub const COMPLETE_DIR: &str = "complete";
/// Subtree of targeted runs
pub const TARGETED_DIR: &str = "targeted";
/// A run directory holding a file with this suffix is a post-process import
pub const POST_PROCESS_SUFFIX: &str = "import.log";

/// Classification of a recorded run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryKind {
    #[serde(rename = "Plan All")]
    PlanAll,
    #[serde(rename = "Targeted")]
    Targeted,
    #[serde(rename = "Post-Process")]
    PostProcess,
}

impl HistoryKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PlanAll => "Plan All",
            Self::Targeted => "Targeted",
            Self::PostProcess => "Post-Process",
        }
    }
}

/// One recorded run as shown in history listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Run (action) id, the directory name
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    /// Number of files directly inside the run directory
    pub nb_logs: usize,
}

/// History tree of one Main/Target tenant pair
#[derive(Debug, Clone)]
pub struct HistoryStore {
    root: PathBuf,
}

impl HistoryStore {
    /// Resolve (and create) the history root of a tenant pair under `data_dir`
    pub fn resolve_history_root(
        data_dir: &Path,
        main: &TenantDescriptor,
        target: &TenantDescriptor,
    ) -> Result<Self> {
        let pair_dir = format!(
            "{}{PAIR_SEPARATOR}{}",
            main.directory_key(),
            target.directory_key()
        );
        let root = data_dir.join(TERRAFORM_DIR).join(pair_dir).join(HISTORY_DIR);
        prep_dir(&root)?;
        Ok(Self { root })
    }

    /// Open an existing history root as is
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory receiving the logs of run `action_id`, created when absent
    pub fn resolve_run_log_path(&self, action_id: &str, is_targeted: bool) -> Result<PathBuf> {
        validate_action_id(action_id)?;

        let subtree = if is_targeted {
            TARGETED_DIR
        } else {
            COMPLETE_DIR
        };
        let path = self.root.join(subtree).join(action_id);
        prep_dir(&path)?;
        Ok(path)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(HISTORY_INDEX_FILE)
    }
}

/// `create_dir_all` with the path attached to the error
fn prep_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(IoError::at(path))?;
    Ok(())
}

/// Action ids become directory names; keep them to a single normal component
fn validate_action_id(action_id: &str) -> Result<()> {
    let mut components = Path::new(action_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !action_id.contains(['/', '\\']) => Ok(()),
        _ => Err(ValidationError::invalid_argument(
            "action_id",
            &format!("'{action_id}' is not a single directory name"),
        )
        .into()),
    }
}
