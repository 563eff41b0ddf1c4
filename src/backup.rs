//! Backup Stage
//!
//! Replaces a backup directory with a fresh recursive copy of its source.
//! Every failure here is fatal: nothing downstream runs without a snapshot.

use crate::error::AssetError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// What a backup copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub files: usize,
    pub directories: usize,
}

fn backup_error(source: &Path, destination: &Path, message: impl Into<String>) -> AssetError {
    AssetError::Backup {
        source_dir: source.to_path_buf(),
        backup_dir: destination.to_path_buf(),
        message: message.into(),
    }
}

/// Canonical form of a path that may not exist yet.
fn canonical_target(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return dunce::canonicalize(path).ok();
    }
    let parent = match path.parent()? {
        p if p.as_os_str().is_empty() => Path::new("."),
        p => p,
    };
    let name = path.file_name()?;
    canonical_target(parent).map(|p| p.join(name))
}

/// Remove `destination` if present, then copy `source` into it.
pub fn backup_tree(source: &Path, destination: &Path) -> Result<BackupReport, AssetError> {
    if !source.is_dir() {
        return Err(backup_error(source, destination, "source directory does not exist"));
    }
    let canonical_source =
        dunce::canonicalize(source).map_err(|e| backup_error(source, destination, e.to_string()))?;
    if let Some(target) = canonical_target(destination) {
        if target.starts_with(&canonical_source) || canonical_source.starts_with(&target) {
            return Err(backup_error(
                source,
                destination,
                "backup directory overlaps the source directory",
            ));
        }
    }

    if destination.is_dir() {
        fs::remove_dir_all(destination)
            .map_err(|e| backup_error(source, destination, format!("removing old backup: {}", e)))?;
    } else if destination.exists() {
        fs::remove_file(destination)
            .map_err(|e| backup_error(source, destination, format!("removing old backup: {}", e)))?;
    }

    let mut report = BackupReport {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        files: 0,
        directories: 0,
    };

    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| backup_error(source, destination, e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| backup_error(source, destination, e.to_string()))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                backup_error(source, destination, format!("{}: {}", target.display(), e))
            })?;
            report.directories += 1;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| {
                backup_error(source, destination, format!("{}: {}", entry.path().display(), e))
            })?;
            report.files += 1;
        }
    }

    info!(
        source = %source.display(),
        destination = %destination.display(),
        files = report.files,
        "Backup complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_replaces_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("image");
        let dst = temp_dir.path().join("backup_image");
        fs::create_dir_all(src.join("chars")).unwrap();
        fs::write(src.join("chars/hero.png"), b"hero").unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("stale.png"), b"stale").unwrap();

        let report = backup_tree(&src, &dst).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.directories, 2);
        assert_eq!(fs::read(dst.join("chars/hero.png")).unwrap(), b"hero");
        assert!(!dst.join("stale.png").exists());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let err = backup_tree(&temp_dir.path().join("nope"), &temp_dir.path().join("b"))
            .unwrap_err();
        assert!(matches!(err, AssetError::Backup { .. }));
    }

    #[test]
    fn test_nested_destination_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("image");
        fs::create_dir_all(&src).unwrap();
        let err = backup_tree(&src, &src.join("backup")).unwrap_err();
        assert!(err.to_string().contains("overlaps"));
        assert!(src.exists());
    }
}
