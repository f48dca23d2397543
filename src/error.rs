use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or config handling.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Coarse classification of a failed storage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    AlreadyExists,
    /// The host grants no storage access at all.
    CapabilityUnavailable,
    Unknown,
}

impl StorageErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            StorageErrorKind::NotFound => "not found",
            StorageErrorKind::PermissionDenied => "permission denied",
            StorageErrorKind::AlreadyExists => "already exists",
            StorageErrorKind::CapabilityUnavailable => "storage unavailable",
            StorageErrorKind::Unknown => "unknown error",
        }
    }
}

/// Error returned by every `Storage` operation.
#[derive(Debug, Clone, Error)]
#[error("{}: {} ({message})", .kind.label(), .path.display())]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub path: PathBuf,
    pub message: String,
}

/// Result type for storage calls.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn new(kind: StorageErrorKind, path: &Path, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Map an `io::Error` raised while touching `path` onto the storage taxonomy.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            _ => StorageErrorKind::Unknown,
        };
        Self::new(kind, path, err.to_string())
    }

    /// The host exposes no storage capability for `operation`.
    pub fn unavailable(operation: &str, path: &Path) -> Self {
        Self::new(
            StorageErrorKind::CapabilityUnavailable,
            path,
            format!("{operation} requires filesystem access"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn invalid_path_error_display() {
        let err = AppError::InvalidPath("/nonexistent".into());
        assert_eq!(err.to_string(), "Invalid path: /nonexistent");
    }

    #[test]
    fn storage_error_maps_io_kinds() {
        let path = Path::new("/ws/a.md");
        let cases = [
            (io::ErrorKind::NotFound, StorageErrorKind::NotFound),
            (io::ErrorKind::PermissionDenied, StorageErrorKind::PermissionDenied),
            (io::ErrorKind::AlreadyExists, StorageErrorKind::AlreadyExists),
            (io::ErrorKind::Interrupted, StorageErrorKind::Unknown),
        ];
        for (io_kind, expected) in cases {
            let err = StorageError::from_io(path, io::Error::new(io_kind, "boom"));
            assert_eq!(err.kind, expected);
            assert_eq!(err.path, PathBuf::from("/ws/a.md"));
        }
    }

    #[test]
    fn storage_error_display_names_kind_and_path() {
        let err = StorageError::new(
            StorageErrorKind::AlreadyExists,
            Path::new("/ws/new.md"),
            "destination taken",
        );
        assert_eq!(
            err.to_string(),
            "already exists: /ws/new.md (destination taken)"
        );
    }

    #[test]
    fn unavailable_error_is_distinct_kind() {
        let err = StorageError::unavailable("create note", Path::new("/ws"));
        assert_eq!(err.kind, StorageErrorKind::CapabilityUnavailable);
        assert!(err.to_string().contains("storage unavailable"));
        assert!(err.to_string().contains("create note"));
    }
}
