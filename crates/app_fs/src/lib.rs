//! DataShelf file system layer
//!
//! Thin wrappers over filesystem primitives used by the catalog:
//! - copying files into and out of managed storage
//! - deleting stored files
//! - handing files and folders to the OS default handler
//! - atomic replacement of small files

mod atomic;
mod file_operations;

pub use atomic::atomic_write;
pub use file_operations::{DefaultFileOperations, FileOperations};

use std::path::PathBuf;
use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Cannot open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, FsError>;
