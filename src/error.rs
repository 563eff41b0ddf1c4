//! Error types for the maintenance pipeline and plugin host boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by library operations.
///
/// Only fatal conditions travel through this type. Advisories (unresolved
/// filenames, unparsable documents, per-asset move failures under the `warn`
/// policy) are logged and recorded in reports instead.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Backup of {} to {} failed: {message}", .source_dir.display(), .backup_dir.display())]
    Backup {
        source_dir: PathBuf,
        backup_dir: PathBuf,
        message: String,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate asset filename {filename}: {first} and {second}")]
    DuplicateAsset {
        filename: String,
        first: String,
        second: String,
    },

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Agent host error: {0}")]
    Host(String),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for AssetError {
    fn from(err: config::ConfigError) -> Self {
        AssetError::ConfigError(err.to_string())
    }
}
