//! CLI Tooling
//!
//! Command-line interface for the maintenance run, check mode, the asset
//! index and the plugin registry. Every command resolves paths against the
//! workspace root and returns its output as a string.

use crate::config::{AssetsConfig, ConfigLoader};
use crate::error::AssetError;
use crate::logging::LoggingConfig;
use crate::maintenance::{MaintenanceRun, RunMode};
use crate::plugin::{HandlerKind, PluginRegistry};
use crate::tooling::format::{format_index_text, format_maintenance_report_text, format_plugins_text};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// maa-assets - pipeline image maintenance for MAA resources
#[derive(Debug, Parser)]
#[command(name = "maa-assets")]
#[command(about = "Repair pipeline template paths and quarantine unreferenced images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags over the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut logging = base.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Back up, repair template paths, and quarantine unreferenced images
    Run {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        #[command(flatten)]
        paths: PathOverrides,
    },
    /// Report what a run would change without touching any file
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        #[command(flatten)]
        paths: PathOverrides,
    },
    /// Print the filename -> path index of the image directory
    Index {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        #[command(flatten)]
        paths: PathOverrides,
    },
    /// List registered custom actions and recognizers
    Plugins {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Per-invocation directory overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct PathOverrides {
    /// Image directory
    #[arg(long)]
    pub image_dir: Option<PathBuf>,
    /// Pipeline directory
    #[arg(long)]
    pub pipeline_dir: Option<PathBuf>,
    /// Image backup directory
    #[arg(long)]
    pub backup_image_dir: Option<PathBuf>,
    /// Pipeline backup directory
    #[arg(long)]
    pub backup_pipeline_dir: Option<PathBuf>,
    /// Quarantine directory name
    #[arg(long)]
    pub quarantine_name: Option<String>,
}

impl PathOverrides {
    fn apply(&self, config: &mut AssetsConfig) {
        if let Some(dir) = &self.image_dir {
            config.paths.image_dir = dir.clone();
        }
        if let Some(dir) = &self.pipeline_dir {
            config.paths.pipeline_dir = dir.clone();
        }
        if let Some(dir) = &self.backup_image_dir {
            config.paths.backup_image_dir = dir.clone();
        }
        if let Some(dir) = &self.backup_pipeline_dir {
            config.paths.backup_pipeline_dir = dir.clone();
        }
        if let Some(name) = &self.quarantine_name {
            config.quarantine.subdir_name = name.clone();
        }
    }
}

#[derive(Serialize)]
struct PluginRow {
    name: &'static str,
    kind: HandlerKind,
}

/// CLI context holding the workspace and its loaded configuration
pub struct CliContext {
    workspace_root: PathBuf,
    config: AssetsConfig,
    registry: PluginRegistry,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, AssetError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    /// Create a context from an already loaded configuration
    pub fn with_config(workspace_root: PathBuf, config: AssetsConfig) -> Self {
        Self {
            workspace_root,
            config,
            registry: PluginRegistry::builtin(),
        }
    }

    pub fn config(&self) -> &AssetsConfig {
        &self.config
    }

    fn config_with(&self, paths: &PathOverrides) -> Result<AssetsConfig, AssetError> {
        let mut config = self.config.clone();
        paths.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, AssetError> {
        match command {
            Commands::Run { format, paths } => self.handle_maintenance(RunMode::Apply, format, paths),
            Commands::Check { format, paths } => {
                self.handle_maintenance(RunMode::Check, format, paths)
            }
            Commands::Index { format, paths } => {
                let json = parse_format(format)?;
                let config = self.config_with(paths)?;
                let index = MaintenanceRun::new(&config, &self.workspace_root).build_index()?;
                if json {
                    to_json(&index)
                } else {
                    Ok(format_index_text(&index))
                }
            }
            Commands::Plugins { format } => {
                let entries = self.registry.list_all();
                if parse_format(format)? {
                    let rows: Vec<PluginRow> = entries
                        .iter()
                        .map(|e| PluginRow {
                            name: e.name,
                            kind: e.kind,
                        })
                        .collect();
                    to_json(&rows)
                } else {
                    Ok(format_plugins_text(entries, &self.config().agent.socket_id))
                }
            }
        }
    }

    fn handle_maintenance(
        &self,
        mode: RunMode,
        format: &str,
        paths: &PathOverrides,
    ) -> Result<String, AssetError> {
        let json = parse_format(format)?;
        let config = self.config_with(paths)?;
        let report = MaintenanceRun::new(&config, &self.workspace_root).execute(mode)?;
        if json {
            to_json(&report)
        } else {
            Ok(format_maintenance_report_text(&report))
        }
    }
}

/// True for json, false for text.
fn parse_format(format: &str) -> Result<bool, AssetError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        other => Err(AssetError::ConfigError(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AssetError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AssetError::ConfigError(format!("Failed to serialize output: {}", e)))
}
