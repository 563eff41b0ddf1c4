//! Image assets: enumeration under an image root and the filename index.

mod index;

pub use index::{AssetIndex, DuplicateAsset};

use crate::error::AssetError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An image file found under the image root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub filename: String,
    /// Relative to the image root, `/`-separated
    pub canonical_path: String,
    pub absolute_path: PathBuf,
}

/// True when `filename` ends with `.<ext>` for one of `extensions` (case-sensitive).
pub fn has_image_extension(filename: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| {
        filename.len() > ext.len()
            && filename.ends_with(ext.as_str())
            && filename[..filename.len() - ext.len()].ends_with('.')
    })
}

/// Join the components of a relative path with `/` regardless of host separator.
pub fn to_canonical(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Enumerate image assets under `root` in sorted walk order.
///
/// Entries below `skip` (the quarantine directory, when it lives inside the
/// image tree) are not visited. Non-UTF-8 names are skipped with a warning.
pub fn enumerate_assets(
    root: &Path,
    extensions: &[String],
    skip: Option<&Path>,
) -> Result<Vec<Asset>, AssetError> {
    if !root.is_dir() {
        return Err(AssetError::io(
            root,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "image root is not a directory",
            ),
        ));
    }

    let mut assets = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| skip.map_or(true, |skip| entry.path() != skip));

    for entry in walker {
        let entry = entry.map_err(|source| AssetError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(filename) = entry.file_name().to_str() else {
            tracing::warn!(path = %entry.path().display(), "Skipping asset with non UTF-8 name");
            continue;
        };
        if !has_image_extension(filename, extensions) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let Some(canonical_path) = to_canonical(relative) else {
            tracing::warn!(path = %entry.path().display(), "Skipping asset with non UTF-8 path");
            continue;
        };
        assets.push(Asset {
            filename: filename.to_string(),
            canonical_path,
            absolute_path: entry.path().to_path_buf(),
        });
    }

    Ok(assets)
}
