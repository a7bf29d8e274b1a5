//! Write-then-rename file replacement

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Replace `target` with `content` without ever exposing a half-written file.
///
/// The bytes go to a sibling `.tmp` file first which is then renamed over the
/// target. A crash before the rename leaves the previous contents in place.
pub fn atomic_write(target: &Path, content: &[u8]) -> crate::Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = target
        .file_name()
        .ok_or_else(|| crate::FsError::InvalidPath(target.display().to_string()))?
        .to_os_string();
    temp_name.push(".tmp");
    let temp_path = target.with_file_name(temp_name);

    let written = write_synced(&temp_path, content).and_then(|()| fs::rename(&temp_path, target));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        tracing::warn!("Failed to write {}: {}", target.display(), e);
        return Err(e.into());
    }

    tracing::trace!("Atomically wrote {} bytes to {}", content.len(), target.display());
    Ok(())
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data.json");

        atomic_write(&target, b"first").unwrap();
        atomic_write(&target, b"second").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"second");
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("deeper").join("data.json");

        atomic_write(&target, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        assert!(atomic_write(&target, b"{}").is_err());
        assert!(!dir.path().join("data.json.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_failed_create_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        // The temp path is occupied by a directory, so creating the file fails
        fs::create_dir(dir.path().join("data.json.tmp")).unwrap();
        let target = dir.path().join("data.json");

        assert!(atomic_write(&target, b"{}").is_err());
        assert!(!target.exists());
    }
}
