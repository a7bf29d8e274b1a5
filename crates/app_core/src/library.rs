//! Directory manager
//!
//! [`Library`] owns the in-memory catalog for the process lifetime together
//! with everything an operation needs: the metadata store, the managed
//! upload root, the current directory selection, a file-operations backend
//! and a clock. Every mutating operation builds the next catalog, writes it
//! to the store, and only then replaces the in-memory copy, so a failed save
//! leaves memory matching disk.

use crate::clock::{LocalClock, TimeSource};
use crate::{AppConfig, AppError, Catalog, FileRecord, MetadataStore, Result};
use app_fs::{DefaultFileOperations, FileOperations};
use std::path::{Path, PathBuf};

pub struct Library {
    catalog: Catalog,
    store: MetadataStore,
    upload_root: PathBuf,
    current: Option<String>,
    file_ops: Box<dyn FileOperations>,
    clock: Box<dyn TimeSource>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("store", &self.store)
            .field("upload_root", &self.upload_root)
            .field("current", &self.current)
            .field("directories", &self.catalog.len())
            .finish()
    }
}

impl Library {
    /// Load the catalog from `store`; fails only on an unreadable or corrupt file
    pub fn open(store: MetadataStore, upload_root: impl Into<PathBuf>) -> Result<Self> {
        let catalog = store.load()?;
        Ok(Self {
            catalog,
            store,
            upload_root: upload_root.into(),
            current: None,
            file_ops: Box::new(DefaultFileOperations::new()),
            clock: Box::new(LocalClock),
        })
    }

    /// Open the library described by the storage section of `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::open(
            MetadataStore::new(&config.storage.data_file),
            &config.storage.upload_root,
        )
    }

    /// Replace the filesystem backend, e.g. with one that never launches programs
    pub fn with_file_operations(mut self, ops: impl FileOperations + 'static) -> Self {
        self.file_ops = Box::new(ops);
        self
    }

    pub fn with_clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Directory names in display order
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.catalog.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.catalog.contains_key(name)
    }

    /// Records of `name` in stored order
    pub fn files(&self, name: &str) -> Result<&[FileRecord]> {
        self.catalog
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::DirectoryNotFound(name.to_string()))
    }

    /// First record called `file_name` in directory `name`
    pub fn find_file(&self, name: &str, file_name: &str) -> Result<&FileRecord> {
        self.files(name)?
            .iter()
            .find(|r| r.name == file_name)
            .ok_or_else(|| AppError::RecordNotFound {
                directory: name.to_string(),
                name: file_name.to_string(),
            })
    }

    // ===== Selection =====

    pub fn current_directory(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn select_directory(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(AppError::DirectoryNotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        tracing::debug!("Selected directory {:?}", name);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    /// Current directory, which must still exist in the catalog
    fn require_current(&self) -> Result<String> {
        let directory = self.current.clone().ok_or(AppError::NoDirectorySelected)?;
        if !self.contains(&directory) {
            return Err(AppError::DirectoryNotFound(directory));
        }
        Ok(directory)
    }

    /// A new directory name must be non-empty and unused
    fn check_new_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(AppError::EmptyName);
        }
        if self.contains(name) {
            return Err(AppError::DirectoryExists(name.to_string()));
        }
        Ok(())
    }

    // ===== Directory operations =====

    /// Add an empty directory.
    ///
    /// Fails with `EmptyName` or `DirectoryExists` without touching anything.
    pub fn create_directory(&mut self, name: &str) -> Result<()> {
        self.check_new_name(name)?;

        let mut next = self.catalog.clone();
        next.insert(name.to_string(), Vec::new());
        self.commit(next)?;

        tracing::info!("Created directory {:?}", name);
        Ok(())
    }

    /// Move the records of `old` under `new`. The renamed entry goes to the
    /// end of the display order.
    ///
    /// The new name is checked first, so renaming a directory onto its own
    /// name fails with `DirectoryExists`.
    pub fn rename_directory(&mut self, old: &str, new: &str) -> Result<()> {
        self.check_new_name(new)?;

        let mut next = self.catalog.clone();
        let records = next
            .shift_remove(old)
            .ok_or_else(|| AppError::DirectoryNotFound(old.to_string()))?;
        next.insert(new.to_string(), records);
        self.commit(next)?;

        if self.current.as_deref() == Some(old) {
            self.current = Some(new.to_string());
        }

        tracing::info!("Renamed directory {:?} -> {:?}", old, new);
        Ok(())
    }

    /// Drop a directory and its records from the catalog.
    ///
    /// Stored files stay on disk. Clears the selection if it pointed here.
    pub fn delete_directory(&mut self, name: &str) -> Result<bool> {
        let mut next = self.catalog.clone();
        let Some(records) = next.shift_remove(name) else {
            return Ok(false);
        };
        self.commit(next)?;

        if self.current.as_deref() == Some(name) {
            self.clear_selection();
        }

        tracing::info!(
            "Deleted directory {:?} ({} records, files left on disk)",
            name,
            records.len()
        );
        Ok(true)
    }

    /// Stable ascending sort of a directory's records by timestamp
    pub fn sort(&mut self, name: &str) -> Result<()> {
        let mut next = self.catalog.clone();
        let records = next
            .get_mut(name)
            .ok_or_else(|| AppError::DirectoryNotFound(name.to_string()))?;
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        self.commit(next)?;

        tracing::info!("Sorted {:?} by timestamp", name);
        Ok(())
    }

    /// Records of `name` matching `query`. Read-only; an empty query returns everything.
    pub fn search(&self, name: &str, query: &str) -> Result<Vec<FileRecord>> {
        Ok(self
            .files(name)?
            .iter()
            .filter(|r| r.matches(query))
            .cloned()
            .collect())
    }

    // ===== File operations =====

    /// Managed folder for the files of directory `name`
    pub fn storage_dir(&self, name: &str) -> PathBuf {
        self.upload_root.join(name)
    }

    /// Copy `source` into the current directory's storage and record it.
    ///
    /// Same-named uploads overwrite the stored file and add another record.
    pub fn upload(&mut self, source: &Path) -> Result<FileRecord> {
        let directory = self.require_current()?;

        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::InvalidPath(source.display().to_string()))?;
        let uploaded_at = self.clock.now();

        let stored = self
            .file_ops
            .copy_into(source, &self.storage_dir(&directory))?;
        let record = FileRecord::new(name, uploaded_at, stored);

        let mut next = self.catalog.clone();
        if let Some(records) = next.get_mut(&directory) {
            records.push(record.clone());
        }
        self.commit(next)?;

        tracing::info!("Uploaded {:?} into {:?}", record.name, directory);
        Ok(record)
    }

    /// Delete the stored file of `record`, then every record in the current
    /// directory sharing its name.
    ///
    /// When the physical delete fails the catalog is left untouched.
    pub fn delete_file(&mut self, record: &FileRecord) -> Result<usize> {
        let directory = self.require_current()?;

        if let Err(e) = self.file_ops.remove_file(record.path()) {
            tracing::warn!("Failed to delete {}: {}", record.path().display(), e);
            return Err(e.into());
        }

        let mut next = self.catalog.clone();
        let mut removed = 0;
        if let Some(records) = next.get_mut(&directory) {
            let before = records.len();
            records.retain(|r| r.name != record.name);
            removed = before - records.len();
        }
        self.commit(next)?;

        tracing::info!("Deleted {:?} from {:?} ({} records)", record.name, directory, removed);
        Ok(removed)
    }

    /// Copy the stored file of `record` to `destination`
    pub fn download(&self, record: &FileRecord, destination: &Path) -> Result<()> {
        self.file_ops.copy_out(record.path(), destination)?;
        Ok(())
    }

    /// Open the stored file with its default application
    pub fn open_file(&self, record: &FileRecord) -> Result<()> {
        self.file_ops.open_external(record.path())?;
        Ok(())
    }

    /// Open the folder holding the stored file
    pub fn open_folder(&self, record: &FileRecord) -> Result<()> {
        self.file_ops.open_containing_folder(record.path())?;
        Ok(())
    }

    /// Persist `next` and make it the live catalog; on failure nothing changes
    fn commit(&mut self, next: Catalog) -> Result<()> {
        self.store.save(&next)?;
        self.catalog = next;
        Ok(())
    }
}
