//! Builder for on-disk history trees

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Lays out `complete/` and `targeted/` run directories in a temp dir
///
/// The temp dir lives as long as the builder's output; drop it to clean up.
pub struct HistoryTreeBuilder {
    root: TempDir,
}

impl HistoryTreeBuilder {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp history root"),
        }
    }

    /// Add a complete run with the given log file names
    pub fn with_complete_run(self, action_id: &str, files: &[&str]) -> Self {
        self.with_run("complete", action_id, files)
    }

    /// Add a targeted run with the given log file names
    pub fn with_targeted_run(self, action_id: &str, files: &[&str]) -> Self {
        self.with_run("targeted", action_id, files)
    }

    /// Write an index file with raw content
    pub fn with_index(self, content: &str) -> Self {
        fs::write(self.root.path().join("history.json"), content)
            .expect("failed to write history index");
        self
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Finish, handing over the temp dir that owns the tree
    pub fn build(self) -> TempDir {
        self.root
    }

    fn with_run(self, subtree: &str, action_id: &str, files: &[&str]) -> Self {
        let dir: PathBuf = self.root.path().join(subtree).join(action_id);
        fs::create_dir_all(&dir).expect("failed to create run directory");
        for file in files {
            fs::write(dir.join(file), "log").expect("failed to write run log");
        }
        self
    }
}

impl Default for HistoryTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
