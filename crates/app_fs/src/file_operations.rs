//! File operations module
//! Provides copy-in, copy-out, delete and open-with-default-handler operations

use crate::{FsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File operations trait
pub trait FileOperations: Send + Sync {
    /// Copy `source` into `target_dir` under its own file name.
    ///
    /// The directory is created if needed and an existing file of the same
    /// name is overwritten. Returns the absolute path of the copy.
    fn copy_into(&self, source: &Path, target_dir: &Path) -> Result<PathBuf>;

    /// Copy a stored file out to `destination`, overwriting it if present
    fn copy_out(&self, source: &Path, destination: &Path) -> Result<()>;

    /// Permanently delete a single file
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Open file with default application
    fn open_external(&self, path: &Path) -> Result<()>;

    /// Open the folder containing `path` with the default file manager.
    ///
    /// A bare file name has no folder to open and is an `InvalidPath`.
    fn open_containing_folder(&self, path: &Path) -> Result<()> {
        let folder = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| FsError::InvalidPath(path.display().to_string()))?;

        self.open_external(folder)
    }
}

/// Default implementation backed by `std::fs` and the `open` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileOperations;

impl DefaultFileOperations {
    pub fn new() -> Self {
        Self
    }
}

impl FileOperations for DefaultFileOperations {
    fn copy_into(&self, source: &Path, target_dir: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(FsError::NotFound(source.to_path_buf()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| FsError::InvalidPath(source.display().to_string()))?;

        fs::create_dir_all(target_dir)?;
        let target = fs::canonicalize(target_dir)?.join(file_name);

        // Copying a file onto itself would truncate it
        if fs::canonicalize(source)? == target {
            tracing::debug!("Source already in place: {}", target.display());
            return Ok(target);
        }

        let bytes = fs::copy(source, &target)?;
        tracing::info!("Copied {} bytes: {} -> {}", bytes, source.display(), target.display());

        Ok(target)
    }

    fn copy_out(&self, source: &Path, destination: &Path) -> Result<()> {
        if !source.is_file() {
            return Err(FsError::NotFound(source.to_path_buf()));
        }

        if destination.exists() && fs::canonicalize(source)? == fs::canonicalize(destination)? {
            return Ok(());
        }

        fs::copy(source, destination)?;
        tracing::info!("Copied: {} -> {}", source.display(), destination.display());

        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        fs::remove_file(path)?;
        tracing::warn!("Permanently deleted: {}", path.display());

        Ok(())
    }

    #[cfg(feature = "open-external")]
    fn open_external(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        open::that(path).map_err(|e| FsError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::info!("Opened externally: {}", path.display());
        Ok(())
    }

    #[cfg(not(feature = "open-external"))]
    fn open_external(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        Err(FsError::Open {
            path: path.to_path_buf(),
            reason: "open-external feature not enabled".to_string(),
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_into_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("cell.csv");
        fs::write(&source, b"1,2,3").unwrap();

        let ops = DefaultFileOperations::new();
        let target_dir = dir.path().join("uploaded_files").join("A");
        let stored = ops.copy_into(&source, &target_dir).unwrap();

        assert!(stored.is_absolute());
        assert_eq!(stored.file_name().unwrap(), "cell.csv");
        assert_eq!(fs::read(&stored).unwrap(), b"1,2,3");
    }

    #[test]
    fn test_copy_into_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("store");
        let ops = DefaultFileOperations::new();

        let first = dir.path().join("a").join("x.txt");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::write(&first, b"old").unwrap();
        ops.copy_into(&first, &target_dir).unwrap();

        let second = dir.path().join("b").join("x.txt");
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&second, b"new content").unwrap();
        let stored = ops.copy_into(&second, &target_dir).unwrap();

        assert_eq!(fs::read(&stored).unwrap(), b"new content");
    }

    #[test]
    fn test_copy_into_same_file_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x.txt");
        fs::write(&source, b"keep me").unwrap();

        let ops = DefaultFileOperations::new();
        let stored = ops.copy_into(&source, dir.path()).unwrap();

        assert_eq!(fs::read(&stored).unwrap(), b"keep me");
    }

    #[test]
    fn test_copy_into_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let ops = DefaultFileOperations::new();

        let result = ops.copy_into(&dir.path().join("missing.txt"), dir.path());
        assert!(matches!(result, Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_copy_out() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x.txt");
        let dest = dir.path().join("download.txt");
        fs::write(&source, b"payload").unwrap();
        fs::write(&dest, b"stale").unwrap();

        let ops = DefaultFileOperations::new();
        ops.copy_out(&source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn test_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");
        fs::write(&path, b"x").unwrap();

        let ops = DefaultFileOperations::new();
        ops.remove_file(&path).unwrap();
        assert!(!path.exists());

        // Second delete reports the missing file
        assert!(matches!(ops.remove_file(&path), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ops = DefaultFileOperations::new();

        let result = ops.open_external(&dir.path().join("gone.txt"));
        assert!(matches!(result, Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_open_folder_of_removed_directory() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("A");
        fs::create_dir(&folder).unwrap();
        let stored = folder.join("cell.csv");
        fs::write(&stored, b"1").unwrap();
        fs::remove_dir_all(&folder).unwrap();

        let ops = DefaultFileOperations::new();
        match ops.open_containing_folder(&stored) {
            Err(FsError::NotFound(path)) => assert_eq!(path, folder),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_open_folder_without_parent() {
        let ops = DefaultFileOperations::new();

        assert!(matches!(
            ops.open_containing_folder(Path::new("cell.csv")),
            Err(FsError::InvalidPath(_))
        ));
    }
}
