//! Error types for enumeration operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up or driving an enumeration.
///
/// Per-entry filesystem failures never surface here: they are reported on
/// the yielded [`FileRecord`](crate::FileRecord) instead.
#[derive(Debug, Error)]
pub enum EnumError {
    /// A caller-supplied argument violated a precondition.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl EnumError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_error_io_classifies_kind() {
        let err = EnumError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, EnumError::PermissionDenied { .. }));

        let err = EnumError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, EnumError::NotFound { .. }));

        let err = EnumError::io("/test/path", std::io::Error::other("boom"));
        assert!(matches!(err, EnumError::Io { .. }));
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = EnumError::invalid_argument("root path cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid argument: root path cannot be empty"
        );
    }
}
