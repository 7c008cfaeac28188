//! Error types for the confsync core library
//!
//! Errors are grouped by where they originate so callers can decide which
//! failures are fatal and which can be reported and skipped.

use thiserror::Error;

pub mod io;
pub mod protocol;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::protocol::ProtocolError;
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the confsync core library
///
/// - I/O errors: log artifacts and the history tree
/// - Protocol errors: backend HTTP calls and their payloads
/// - Validation errors: environment, arguments and persisted data
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Backend protocol errors
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::path::Path;

    #[test]
    fn test_std_io_error_converts_to_io_variant() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: Error = source.into();

        match error {
            Error::Io(io_err) => assert_eq!(io_err.kind, IoErrorKind::FileNotFound),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_missing_environment_is_validation_error() {
        let error: Error = ValidationError::missing_environment("DYNATRACE_ENV_URL").into();

        assert!(matches!(error, Error::Validation(_)));
        assert!(error.to_string().contains("DYNATRACE_ENV_URL"));
    }

    #[test]
    fn test_phase_failed_message_names_artifact() {
        let error: Error = ProtocolError::phase_failed(
            "extract_configs",
            500,
            Path::new("logs/2024-03-13_10-30-15-extract_configs-ERROR.log"),
        )
        .into();

        let message = error.to_string();
        assert!(message.contains("500 in phase extract_configs"));
        assert!(message.contains("extract_configs-ERROR.log"));
    }

    #[test]
    fn test_transparent_source_chain() {
        let source = std::io::Error::other("disk full");
        let error: Error = IoError::from_std(source)
            .with_path(Path::new("logs/run-plan.log"))
            .into();

        // Transparent wrapper forwards to the inner IoError, whose source is the std error
        let inner = error.source().expect("transparent source");
        assert!(inner.to_string().contains("disk full"));
    }
}
