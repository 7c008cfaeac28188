//! History index persistence
//!
//! The index is a free-form JSON object owned by whoever drives the history
//! (UI, scripts). Reading tells "absent" apart from "unreadable" so callers
//! can decide whether a broken index is fatal.

use super::HistoryStore;
use crate::error::{IoError, Result, ValidationError};
use std::fs;
use std::io;

/// Contents of `history.json`
pub type HistoryIndex = serde_json::Map<String, serde_json::Value>;

impl HistoryStore {
    /// Read the index; `Ok(None)` when the file does not exist
    ///
    /// Malformed JSON (or JSON that is not an object) is a
    /// [`ValidationError::MalformedIndex`]; permission and other I/O failures
    /// are reported as [`IoError`] with the index path attached.
    pub fn read_history_index(&self) -> Result<Option<HistoryIndex>> {
        let path = self.index_path();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IoError::from_std(e).with_path(&path).into()),
        };

        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| ValidationError::malformed_index(&path, e.to_string()))?;

        match value {
            serde_json::Value::Object(index) => Ok(Some(index)),
            other => Err(ValidationError::malformed_index(
                &path,
                format!("expected a JSON object, found {}", json_type(&other)),
            )
            .into()),
        }
    }

    /// Read the index, treating an absent file as an empty index
    pub fn load_history_index(&self) -> Result<HistoryIndex> {
        Ok(self.read_history_index()?.unwrap_or_default())
    }

    /// Overwrite the index with `payload`
    pub fn save_history_index(&self, payload: &HistoryIndex) -> Result<()> {
        let path = self.index_path();
        let content = serde_json::to_string(payload)
            .map_err(|e| ValidationError::malformed_index(&path, e.to_string()))?;

        fs::write(&path, content).map_err(IoError::at(&path))?;
        log::debug!("Saved history index {}", path.display());
        Ok(())
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
