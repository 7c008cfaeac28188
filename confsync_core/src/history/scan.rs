//! Directory scans over the history tree

use super::{
    COMPLETE_DIR, HistoryEntry, HistoryKind, HistoryStore, POST_PROCESS_SUFFIX, TARGETED_DIR,
    prep_dir,
};
use crate::error::{IoError, Result, ValidationError};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

impl HistoryStore {
    /// All recorded runs of both subtrees, newest first
    ///
    /// Run ids are timestamps, so the descending name order is also
    /// reverse-chronological. Directories without files are skipped.
    pub fn list_history_entries(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.scan_subtree(COMPLETE_DIR, HistoryKind::PlanAll)?;
        entries.extend(self.scan_subtree(TARGETED_DIR, HistoryKind::Targeted)?);

        entries.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(entries)
    }

    fn scan_subtree(&self, subtree: &str, label: HistoryKind) -> Result<Vec<HistoryEntry>> {
        let path = self.root().join(subtree);
        prep_dir(&path)?;

        let mut entries = Vec::new();
        for run_dir in immediate_children(&path)? {
            if !run_dir.file_type().is_dir() {
                continue;
            }

            let files = direct_files(run_dir.path())?;
            if files.is_empty() {
                continue;
            }

            let is_post_process = files.iter().any(|name| name.ends_with(POST_PROCESS_SUFFIX));
            entries.push(HistoryEntry {
                name: run_dir.file_name().to_string_lossy().into_owned(),
                kind: if is_post_process {
                    HistoryKind::PostProcess
                } else {
                    label
                },
                nb_logs: files.len(),
            });
        }

        Ok(entries)
    }
}

/// Number of files directly inside each immediate subdirectory of `path`
///
/// Files at the top level and anything nested deeper than one level are not
/// counted.
pub fn count_files_per_subdirectory(path: &Path) -> Result<BTreeMap<String, usize>> {
    if !path.is_dir() {
        return Err(ValidationError::invalid_argument(
            "path",
            &format!("{} is not a directory", path.display()),
        )
        .into());
    }

    let mut counts = BTreeMap::new();
    for child in immediate_children(path)? {
        if child.file_type().is_dir() {
            let name = child.file_name().to_string_lossy().into_owned();
            counts.insert(name, direct_files(child.path())?.len());
        }
    }

    Ok(counts)
}

/// Entries exactly one level below `path`, symlinks resolved
///
/// Dangling links are skipped.
fn immediate_children(path: &Path) -> Result<Vec<DirEntry>> {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(Ok(entry)),
            Err(e) if is_dangling_link(&e) => None,
            Err(e) => Some(Err(walk_error(path, e))),
        })
        .collect()
}

fn is_dangling_link(error: &walkdir::Error) -> bool {
    error.depth() > 0
        && error
            .io_error()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

/// Names of the regular files directly inside `path`
fn direct_files(path: &Path) -> Result<Vec<String>> {
    Ok(immediate_children(path)?
        .into_iter()
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect())
}

fn walk_error(root: &Path, error: walkdir::Error) -> crate::error::Error {
    let path = error.path().unwrap_or(root).to_path_buf();
    match error.into_io_error() {
        Some(io) => IoError::from_std(io).with_path(&path).into(),
        None => IoError::from_std(std::io::Error::other("filesystem loop detected"))
            .with_path(&path)
            .into(),
    }
}
