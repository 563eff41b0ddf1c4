//! Unused Asset Quarantine
//!
//! Moves image assets that no pipeline document references into a review
//! directory. Destination names never collide: `a.png`, `a_1.png`, `a_2.png`.

use crate::assets::{enumerate_assets, Asset};
use crate::config::MoveErrorPolicy;
use crate::error::AssetError;
use crate::types::ReferenceSet;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One relocated asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedAsset {
    pub filename: String,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// An asset that could not be moved under the `warn` policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedMove {
    pub from: PathBuf,
    pub to: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuarantineReport {
    pub quarantine_dir: PathBuf,
    /// Assets seen under the image root before any move
    pub scanned: usize,
    pub moved: Vec<MovedAsset>,
    pub failed: Vec<FailedMove>,
}

/// First path in `dir` for `filename` that does not exist yet.
pub fn unique_destination(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }
    let as_path = Path::new(filename);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    let extension = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1usize;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Rename, falling back to copy + remove when the rename crosses filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if fs::copy(from, to).is_err() {
                return Err(rename_err);
            }
            finish_copy(from, to, |path| fs::remove_file(path))
        }
    }
}

/// Remove the source of a completed copy; on failure drop the copy so the
/// asset exists in exactly one place.
fn finish_copy(
    from: &Path,
    to: &Path,
    remove: impl FnOnce(&Path) -> std::io::Result<()>,
) -> std::io::Result<()> {
    if let Err(e) = remove(from) {
        if let Err(cleanup) = fs::remove_file(to) {
            warn!(copy = %to.display(), error = %cleanup, "Failed to remove partial quarantine copy");
        }
        return Err(e);
    }
    Ok(())
}

/// Names of unreferenced assets under `image_root` (assets inside `quarantine_dir` excluded).
pub fn find_unused(
    image_root: &Path,
    extensions: &[String],
    quarantine_dir: &Path,
    referenced: &ReferenceSet,
) -> Result<(usize, Vec<Asset>), AssetError> {
    let assets = enumerate_assets(image_root, extensions, Some(quarantine_dir))?;
    let scanned = assets.len();
    let unused = assets
        .into_iter()
        .filter(|asset| !referenced.contains(&asset.filename))
        .collect();
    Ok((scanned, unused))
}

/// Move every unreferenced asset under `image_root` into `quarantine_dir`.
pub fn quarantine_unused(
    image_root: &Path,
    extensions: &[String],
    quarantine_dir: &Path,
    referenced: &ReferenceSet,
    policy: MoveErrorPolicy,
) -> Result<QuarantineReport, AssetError> {
    let (scanned, unused) = find_unused(image_root, extensions, quarantine_dir, referenced)?;
    let mut report = QuarantineReport {
        quarantine_dir: quarantine_dir.to_path_buf(),
        scanned,
        ..QuarantineReport::default()
    };
    if unused.is_empty() {
        info!(scanned, "No unused assets found");
        return Ok(report);
    }

    if !quarantine_dir.is_dir() {
        fs::create_dir_all(quarantine_dir).map_err(|e| AssetError::io(quarantine_dir, e))?;
        info!(dir = %quarantine_dir.display(), "Created quarantine directory");
    }

    move_unused(unused, quarantine_dir, policy, &mut report)?;
    info!(moved = report.moved.len(), failed = report.failed.len(), "Quarantine complete");
    Ok(report)
}

fn move_unused(
    unused: Vec<Asset>,
    quarantine_dir: &Path,
    policy: MoveErrorPolicy,
    report: &mut QuarantineReport,
) -> Result<(), AssetError> {
    for asset in unused {
        let destination = unique_destination(quarantine_dir, &asset.filename);
        match move_file(&asset.absolute_path, &destination) {
            Ok(()) => {
                info!(
                    filename = %asset.filename,
                    from = %asset.canonical_path,
                    to = %destination.display(),
                    "Unreferenced asset moved"
                );
                report.moved.push(MovedAsset {
                    filename: asset.filename,
                    from: asset.absolute_path,
                    to: destination,
                });
            }
            Err(source) if policy == MoveErrorPolicy::Abort => {
                return Err(AssetError::Move {
                    from: asset.absolute_path,
                    to: destination,
                    source,
                });
            }
            Err(e) => {
                warn!(
                    from = %asset.absolute_path.display(),
                    to = %destination.display(),
                    error = %e,
                    "Failed to move unreferenced asset"
                );
                report.failed.push(FailedMove {
                    from: asset.absolute_path,
                    to: destination,
                    error: e.to_string(),
                });
            }
        }
    }
    Ok(())
}
