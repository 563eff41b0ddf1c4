//! Configuration
//!
//! Directory layout, scan rules, quarantine policy, agent identity and logging.
//! Loaded through [`ConfigLoader`]; every field has a serde default so an empty
//! source set yields a working configuration.

mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Name of the optional per-workspace config file.
pub const WORKSPACE_CONFIG_FILE: &str = "maa-assets.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub quarantine: QuarantineConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("MaaYYs/image")
}

fn default_pipeline_dir() -> PathBuf {
    PathBuf::from("MaaYYs/pipeline")
}

fn default_backup_image_dir() -> PathBuf {
    PathBuf::from("backup_image")
}

fn default_backup_pipeline_dir() -> PathBuf {
    PathBuf::from("backup_pipeline")
}

/// Input and backup directories (relative to workspace root unless absolute)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    #[serde(default = "default_pipeline_dir")]
    pub pipeline_dir: PathBuf,

    #[serde(default = "default_backup_image_dir")]
    pub backup_image_dir: PathBuf,

    #[serde(default = "default_backup_pipeline_dir")]
    pub backup_pipeline_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            pipeline_dir: default_pipeline_dir(),
            backup_image_dir: default_backup_image_dir(),
            backup_pipeline_dir: default_backup_pipeline_dir(),
        }
    }
}

/// What to do when two assets share a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the last one in walk order and log every duplicate
    #[default]
    Warn,
    /// Abort before any document is modified
    Error,
}

fn default_reserved_key() -> String {
    "template".to_string()
}

fn default_image_extensions() -> Vec<String> {
    vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()]
}

fn default_document_extension() -> String {
    "json".to_string()
}

/// Scan rules for assets and pipeline documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Field whose value is an asset path or list of asset paths
    #[serde(default = "default_reserved_key")]
    pub reserved_key: String,

    /// Asset extensions without the dot; matched case-sensitively
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    #[serde(default = "default_document_extension")]
    pub document_extension: String,

    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            reserved_key: default_reserved_key(),
            image_extensions: default_image_extensions(),
            document_extension: default_document_extension(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// What to do when a single asset cannot be moved into quarantine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveErrorPolicy {
    #[default]
    Warn,
    Abort,
}

fn default_subdir_name() -> String {
    "unused".to_string()
}

/// Quarantine placement and failure policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantineConfig {
    /// Directory name created under the quarantine root
    #[serde(default = "default_subdir_name")]
    pub subdir_name: String,

    /// Quarantine root; None means the directory holding the image backup
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub on_move_error: MoveErrorPolicy,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self {
            subdir_name: default_subdir_name(),
            root: None,
            on_move_error: MoveErrorPolicy::default(),
        }
    }
}

fn default_socket_id() -> String {
    "111-222-333-444".to_string()
}

/// Agent host identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_socket_id")]
    pub socket_id: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            socket_id: default_socket_id(),
        }
    }
}

/// Directories after resolution against the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub image_dir: PathBuf,
    pub pipeline_dir: PathBuf,
    pub backup_image_dir: PathBuf,
    pub backup_pipeline_dir: PathBuf,
    pub quarantine_dir: PathBuf,
}

impl AssetsConfig {
    /// Resolve configured directories to filesystem locations.
    pub fn resolve_paths(&self, workspace_root: &Path) -> ResolvedPaths {
        let backup_image_dir = workspace_root.join(&self.paths.backup_image_dir);
        let quarantine_root = match &self.quarantine.root {
            Some(root) => workspace_root.join(root),
            None => backup_image_dir
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(workspace_root)
                .to_path_buf(),
        };

        ResolvedPaths {
            image_dir: workspace_root.join(&self.paths.image_dir),
            pipeline_dir: workspace_root.join(&self.paths.pipeline_dir),
            backup_pipeline_dir: workspace_root.join(&self.paths.backup_pipeline_dir),
            quarantine_dir: quarantine_root.join(&self.quarantine.subdir_name),
            backup_image_dir,
        }
    }

    /// Reject values that would make a run misbehave.
    pub fn validate(&self) -> Result<(), crate::error::AssetError> {
        use crate::error::AssetError;

        if self.scan.reserved_key.is_empty() {
            return Err(AssetError::ConfigError(
                "scan.reserved_key must not be empty".to_string(),
            ));
        }
        if self.scan.image_extensions.is_empty() {
            return Err(AssetError::ConfigError(
                "scan.image_extensions must list at least one extension".to_string(),
            ));
        }
        if let Some(ext) = self
            .scan
            .image_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(AssetError::ConfigError(format!(
                "scan.image_extensions entries are written without the dot, got {:?}",
                ext
            )));
        }
        let name = &self.quarantine.subdir_name;
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name == "."
            || name == ".."
        {
            return Err(AssetError::ConfigError(format!(
                "quarantine.subdir_name must be a single directory name, got {:?}",
                name
            )));
        }
        Ok(())
    }
}

/// Lexically resolve `.` and `..` so paths can be compared without touching disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl ResolvedPaths {
    /// Reject layouts where a backup would wipe the quarantine directory.
    ///
    /// The quarantine directory must be disjoint from both backup directories
    /// and must not contain a source tree.
    pub fn validate(&self) -> Result<(), crate::error::AssetError> {
        use crate::error::AssetError;

        let quarantine = normalize(&self.quarantine_dir);
        for backup in [&self.backup_image_dir, &self.backup_pipeline_dir] {
            let backup = normalize(backup);
            if quarantine.starts_with(&backup) || backup.starts_with(&quarantine) {
                return Err(AssetError::ConfigError(format!(
                    "quarantine directory {} overlaps backup directory {}",
                    self.quarantine_dir.display(),
                    backup.display()
                )));
            }
        }
        for source in [&self.image_dir, &self.pipeline_dir] {
            if normalize(source).starts_with(&quarantine) {
                return Err(AssetError::ConfigError(format!(
                    "quarantine directory {} contains source directory {}",
                    self.quarantine_dir.display(),
                    source.display()
                )));
            }
        }
        Ok(())
    }
}
