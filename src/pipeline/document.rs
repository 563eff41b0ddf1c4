//! Pipeline documents on disk.

use crate::error::AssetError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A parsed JSON pipeline file. Key order is kept as read.
#[derive(Debug, Clone)]
pub struct PipelineDocument {
    pub path: PathBuf,
    pub value: Value,
}

impl PipelineDocument {
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        let value = serde_json::from_str(&text).map_err(|source| AssetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            value,
        })
    }

    /// Serialize with two-space indentation and literal non-ASCII text.
    pub fn render(&self) -> Result<String, AssetError> {
        serde_json::to_string_pretty(&self.value).map_err(|source| AssetError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the file this document was loaded from.
    pub fn save(&self) -> Result<(), AssetError> {
        let text = self.render()?;
        fs::write(&self.path, text).map_err(|e| AssetError::io(&self.path, e))
    }
}

/// Every file under `root` whose name ends with `.<extension>`, in sorted walk order.
pub fn document_paths(root: &Path, extension: &str) -> Result<Vec<PathBuf>, AssetError> {
    let suffix = format!(".{}", extension);
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| AssetError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let matches = entry
            .file_name()
            .to_str()
            .map_or(false, |name| name.ends_with(&suffix));
        if entry.file_type().is_file() && matches {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Load a document, logging and returning None when it cannot be read or parsed.
pub fn load_or_skip(path: &Path) -> Option<PipelineDocument> {
    match PipelineDocument::load(path) {
        Ok(document) => Some(document),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable pipeline document");
            None
        }
    }
}
