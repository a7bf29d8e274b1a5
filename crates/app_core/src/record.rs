//! Catalog data model

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Timestamp layout stored in the metadata file. Zero padded, so string
/// order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Every directory name mapped to its records, in insertion order
pub type Catalog = IndexMap<String, Vec<FileRecord>>;

/// One uploaded file as shown in a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Display name, the base name of the uploaded file
    pub name: String,
    /// Upload time formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
    /// Absolute path of the copy in managed storage
    pub path: PathBuf,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, uploaded_at: NaiveDateTime, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            timestamp: format_timestamp(uploaded_at),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Search predicate: case-insensitive on the name, plain substring on the timestamp
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.timestamp.contains(&query)
    }
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
