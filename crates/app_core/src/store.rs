//! JSON metadata store
//!
//! The whole catalog is the unit of persistence: `load` reads it once at
//! startup and `save` rewrites the file after every mutation.

use crate::{AppError, Catalog, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};

/// Backing file of the catalog
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog; a missing file is an empty catalog
    pub fn load(&self) -> Result<Catalog> {
        if !self.path.exists() {
            tracing::info!("No metadata file at {:?}, starting empty", self.path);
            return Ok(Catalog::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let catalog: Catalog = serde_json::from_str(&content).map_err(|source| AppError::Parse {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(
            "Loaded {} directories from {:?}",
            catalog.len(),
            self.path
        );
        Ok(catalog)
    }

    /// Overwrite the backing file with the full catalog
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        let content = to_pretty_json(catalog)?;
        app_fs::atomic_write(&self.path, &content)?;

        tracing::debug!("Saved {} directories to {:?}", catalog.len(), self.path);
        Ok(())
    }
}

/// Four-space indented JSON with non-ASCII text kept as UTF-8
fn to_pretty_json(catalog: &Catalog) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    catalog
        .serialize(&mut serializer)
        .map_err(|e| AppError::Io(e.into()))?;
    Ok(buf)
}
