//! Asset index: bare filename -> canonical relative path.

use super::{enumerate_assets, Asset};
use crate::config::DuplicatePolicy;
use crate::error::AssetError;
use crate::types::{CanonicalPath, Filename};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Two assets sharing a filename; `kept` is the one the index resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateAsset {
    pub filename: Filename,
    pub kept: CanonicalPath,
    pub shadowed: CanonicalPath,
}

/// Read-only mapping built once per run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetIndex {
    entries: BTreeMap<Filename, CanonicalPath>,
    duplicates: Vec<DuplicateAsset>,
}

impl AssetIndex {
    /// Walk `image_root` and index every asset with a matching extension.
    pub fn build(
        image_root: &Path,
        extensions: &[String],
        policy: DuplicatePolicy,
    ) -> Result<Self, AssetError> {
        let assets = enumerate_assets(image_root, extensions, None)?;
        let index = Self::from_assets(assets, policy)?;
        debug!(
            root = %image_root.display(),
            assets = index.len(),
            duplicates = index.duplicates.len(),
            "Asset index built"
        );
        Ok(index)
    }

    /// Index already enumerated assets; later entries win on duplicate filenames.
    pub fn from_assets(
        assets: impl IntoIterator<Item = Asset>,
        policy: DuplicatePolicy,
    ) -> Result<Self, AssetError> {
        let mut index = AssetIndex::default();
        for asset in assets {
            if let Some(previous) = index
                .entries
                .insert(asset.filename.clone(), asset.canonical_path.clone())
            {
                if policy == DuplicatePolicy::Error {
                    return Err(AssetError::DuplicateAsset {
                        filename: asset.filename,
                        first: previous,
                        second: asset.canonical_path,
                    });
                }
                warn!(
                    filename = %asset.filename,
                    kept = %asset.canonical_path,
                    shadowed = %previous,
                    "Duplicate asset filename"
                );
                index.duplicates.push(DuplicateAsset {
                    filename: asset.filename,
                    kept: asset.canonical_path,
                    shadowed: previous,
                });
            }
        }
        Ok(index)
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn duplicates(&self) -> &[DuplicateAsset] {
        &self.duplicates
    }
}
