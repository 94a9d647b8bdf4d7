use std::path::Path;

use thiserror::Error;

use crate::devto::ApiError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("cannot parse state: {0}")]
    Parse(String),
    #[error("io error on '{path}': {message}")]
    Io { path: String, message: String },
    #[error("skipping file with previous failures: {0}")]
    Skipped(String),
    #[error("file checksums match, not updating: {0}")]
    NoChange(String),
    #[error("failed to update file '{path}': {source}")]
    Upstream {
        path: String,
        #[source]
        source: ApiError,
    },
    #[error("keychain error: {0}")]
    Keychain(String),
}

impl SyncError {
    pub fn io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        SyncError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SyncError::Validation(_) => "VALIDATION",
            SyncError::Parse(_) => "PARSE",
            SyncError::Io { .. } => "IO",
            SyncError::Skipped(_) => "SKIPPED",
            SyncError::NoChange(_) => "NO_CHANGE",
            SyncError::Upstream { .. } => "UPSTREAM",
            SyncError::Keychain(_) => "KEYCHAIN",
        }
    }

    /// Outcomes that are part of normal operation and only worth an info line.
    pub fn is_expected(&self) -> bool {
        matches!(self, SyncError::Skipped(_) | SyncError::NoChange(_))
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

impl From<keyring::Error> for SyncError {
    fn from(value: keyring::Error) -> Self {
        SyncError::Keychain(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::SyncError;

    #[test]
    fn skipped_and_no_change_are_expected() {
        assert!(SyncError::Skipped("a.md".to_string()).is_expected());
        assert!(SyncError::NoChange("a.md".to_string()).is_expected());
        assert!(!SyncError::Parse("bad".to_string()).is_expected());
    }

    #[test]
    fn io_error_carries_path() {
        let err = SyncError::io(
            "posts/a.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "IO");
        assert!(err.to_string().contains("posts/a.md"));
    }
}
