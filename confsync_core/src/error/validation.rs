//! Validation related error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required environment variable is not set
    #[error("Missing environment variable: {variable}")]
    MissingEnvironment { variable: String },

    /// Invalid input argument
    #[error("Invalid argument '{parameter}': {reason}")]
    InvalidArgument { parameter: String, reason: String },

    /// The history index exists but is not a JSON object
    #[error("Malformed history index {}: {message}", .path.display())]
    MalformedIndex { path: PathBuf, message: String },
}

impl ValidationError {
    /// Create a missing environment variable error
    pub fn missing_environment(variable: &str) -> Self {
        Self::MissingEnvironment {
            variable: variable.to_string(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(parameter: &str, reason: &str) -> Self {
        Self::InvalidArgument {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a malformed index error
    pub fn malformed_index(path: &Path, message: impl Into<String>) -> Self {
        Self::MalformedIndex {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
