//! Backend protocol error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while talking to the sync backend
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The request never produced a response (connection refused, DNS, TLS...)
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The backend answered a phase with a non-success status
    #[error("{status} in phase {endpoint} - see response {}", .artifact.display())]
    PhaseFailed {
        endpoint: String,
        status: u16,
        artifact: PathBuf,
    },

    /// The response body does not match the expected schema
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// The apply phase finished without `apply_complete`
    #[error("CONFIG APPLY FAILED OR PARTIAL - see {}", .artifact.display())]
    ApplyIncomplete { artifact: PathBuf },
}

impl ProtocolError {
    /// Create a transport error
    pub fn transport(endpoint: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// Create a phase failure pointing at the persisted error body
    pub fn phase_failed(endpoint: &str, status: u16, artifact: &Path) -> Self {
        Self::PhaseFailed {
            endpoint: endpoint.to_string(),
            status,
            artifact: artifact.to_path_buf(),
        }
    }

    /// Create an incomplete-apply error pointing at the persisted apply result
    pub fn apply_incomplete(artifact: &Path) -> Self {
        Self::ApplyIncomplete {
            artifact: artifact.to_path_buf(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(endpoint: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status of the failed phase, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::PhaseFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
