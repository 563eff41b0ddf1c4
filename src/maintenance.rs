//! Maintenance Run
//!
//! Sequences the stages: Backup -> Index -> Reconcile -> Collect -> Quarantine.
//! Check mode evaluates the same pipeline in memory and touches nothing.

use crate::assets::{AssetIndex, DuplicateAsset};
use crate::backup::{backup_tree, BackupReport};
use crate::config::{AssetsConfig, ResolvedPaths};
use crate::error::AssetError;
use crate::quarantine::{find_unused, quarantine_unused, QuarantineReport};
use crate::reconcile::{collect_from_dir, collect_from_documents, reconcile_dir, ReconcileReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Whether a run mutates the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Apply,
    Check,
}

/// Everything a run did (or, in check mode, would do).
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceReport {
    pub mode: RunMode,
    pub paths: ResolvedPaths,
    pub backups: Vec<BackupReport>,
    pub indexed_assets: usize,
    pub duplicates: Vec<DuplicateAsset>,
    pub reconcile: ReconcileReport,
    pub referenced: usize,
    pub quarantine: QuarantineReport,
    /// Check mode only: assets a real run would move
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unused_candidates: Vec<PathBuf>,
    pub elapsed_ms: u64,
}

/// Runs the maintenance pipeline for one workspace.
pub struct MaintenanceRun<'a> {
    config: &'a AssetsConfig,
    paths: ResolvedPaths,
}

impl<'a> MaintenanceRun<'a> {
    pub fn new(config: &'a AssetsConfig, workspace_root: &Path) -> Self {
        Self {
            config,
            paths: config.resolve_paths(workspace_root),
        }
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    /// Build the asset index for the configured image directory.
    pub fn build_index(&self) -> Result<AssetIndex, AssetError> {
        AssetIndex::build(
            &self.paths.image_dir,
            &self.config.scan.image_extensions,
            self.config.scan.duplicate_policy,
        )
    }

    pub fn execute(&self, mode: RunMode) -> Result<MaintenanceReport, AssetError> {
        let started = Instant::now();
        let scan = &self.config.scan;
        self.paths.validate()?;
        info!(mode = ?mode, image_dir = %self.paths.image_dir.display(), pipeline_dir = %self.paths.pipeline_dir.display(), "Maintenance run started");

        let mut backups = Vec::new();
        if mode == RunMode::Apply {
            backups.push(backup_tree(
                &self.paths.image_dir,
                &self.paths.backup_image_dir,
            )?);
            backups.push(backup_tree(
                &self.paths.pipeline_dir,
                &self.paths.backup_pipeline_dir,
            )?);
        }

        let index = self.build_index()?;
        debug!(assets = index.len(), "Index stage complete");

        let (reconcile, documents) = reconcile_dir(
            &self.paths.pipeline_dir,
            &scan.document_extension,
            &index,
            &scan.reserved_key,
            mode == RunMode::Apply,
        )?;

        let referenced = match mode {
            RunMode::Apply => collect_from_dir(
                &self.paths.pipeline_dir,
                &scan.document_extension,
                &scan.reserved_key,
            )?,
            RunMode::Check => {
                collect_from_documents(documents.iter().map(|d| &d.value), &scan.reserved_key)
            }
        };

        let mut unused_candidates = Vec::new();
        let quarantine = match mode {
            RunMode::Apply => quarantine_unused(
                &self.paths.image_dir,
                &scan.image_extensions,
                &self.paths.quarantine_dir,
                &referenced,
                self.config.quarantine.on_move_error,
            )?,
            RunMode::Check => {
                let (scanned, unused) = find_unused(
                    &self.paths.image_dir,
                    &scan.image_extensions,
                    &self.paths.quarantine_dir,
                    &referenced,
                )?;
                unused_candidates = unused.into_iter().map(|a| a.absolute_path).collect();
                QuarantineReport {
                    quarantine_dir: self.paths.quarantine_dir.clone(),
                    scanned,
                    ..QuarantineReport::default()
                }
            }
        };

        let report = MaintenanceReport {
            mode,
            paths: self.paths.clone(),
            backups,
            indexed_assets: index.len(),
            duplicates: index.duplicates().to_vec(),
            referenced: referenced.len(),
            reconcile,
            quarantine,
            unused_candidates,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            corrections = report.reconcile.corrections(),
            unresolved = report.reconcile.unresolved(),
            rewritten = report.reconcile.rewritten(),
            moved = report.quarantine.moved.len(),
            elapsed_ms = report.elapsed_ms,
            "Maintenance run finished"
        );
        Ok(report)
    }
}
