//! Application error types

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== User errors (invalid input, nothing mutated) =====
    #[error("Directory name must not be empty")]
    EmptyName,

    #[error("Directory already exists: {0}")]
    DirectoryExists(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("No directory selected")]
    NoDirectorySelected,

    #[error("No file named {name} in {directory}")]
    RecordNotFound { directory: String, name: String },

    // ===== I/O errors (reported, operation aborted) =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Cannot open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    // ===== Fatal errors (startup cannot continue) =====
    #[error("Metadata file {} is corrupt: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Is this an input problem rather than a system failure?
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::EmptyName
                | AppError::DirectoryExists(_)
                | AppError::DirectoryNotFound(_)
                | AppError::NoDirectorySelected
                | AppError::RecordNotFound { .. }
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Parse { .. } | AppError::Config(_))
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::NoDirectorySelected => "Please select a directory first".to_string(),
            AppError::FileNotFound(path) => {
                format!("The stored file is missing: {}", path.display())
            }
            AppError::Parse { path, .. } => format!(
                "Cannot read {}: the file is not valid directory data. \
                 Fix or move it away and start again.",
                path.display()
            ),
            _ => self.to_string(),
        }
    }
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::Io(io) => AppError::Io(io),
            app_fs::FsError::NotFound(p) => AppError::FileNotFound(p),
            app_fs::FsError::InvalidPath(p) => AppError::InvalidPath(p),
            app_fs::FsError::Open { path, reason } => AppError::Open { path, reason },
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(AppError::NoDirectorySelected.is_user_error());
        assert!(!AppError::NoDirectorySelected.is_fatal());

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::Parse {
            path: PathBuf::from("directory_data.json"),
            source: parse,
        };
        assert!(err.is_fatal());
        assert!(!err.is_user_error());
        assert!(err.user_message().contains("directory_data.json"));
    }

    #[test]
    fn test_from_fs_error() {
        let err: AppError = app_fs::FsError::NotFound(PathBuf::from("/tmp/x")).into();
        assert!(matches!(err, AppError::FileNotFound(_)));
    }
}
