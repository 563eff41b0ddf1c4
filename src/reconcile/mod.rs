//! Path Reconciler
//!
//! Rewrites stale reserved-key paths to the canonical path recorded in the
//! asset index. Filenames the index does not know are left alone and reported
//! as advisories. A document is only written back when something changed.

mod collect;

pub use collect::{collect_from_dir, collect_from_documents};

use crate::assets::AssetIndex;
use crate::error::AssetError;
use crate::pipeline::walker::display_location;
use crate::pipeline::{basename, document_paths, load_or_skip, references, PipelineDocument};
use crate::types::FieldPath;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A stored path replaced by its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub location: FieldPath,
    pub old: String,
    pub new: String,
}

/// A reference whose filename is not in the asset index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub location: FieldPath,
    pub filename: String,
}

/// Result of reconciling one document in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub corrections: Vec<Correction>,
    pub unresolved: Vec<Unresolved>,
}

impl DocumentOutcome {
    pub fn is_dirty(&self) -> bool {
        !self.corrections.is_empty()
    }
}

/// Canonical replacement for `stored`, or None when it is already canonical or unknown.
pub fn canonical_for<'i>(stored: &str, index: &'i AssetIndex) -> Option<&'i str> {
    index
        .get(basename(stored))
        .filter(|canonical| *canonical != stored)
}

/// Reconcile every reference in `document` against `index`, mutating it in place.
pub fn reconcile_document(
    document: &mut Value,
    index: &AssetIndex,
    reserved_key: &str,
) -> DocumentOutcome {
    let mut outcome = DocumentOutcome::default();
    let mut pointers = Vec::new();
    for reference in references(document, reserved_key) {
        let filename = basename(reference.stored);
        match canonical_for(reference.stored, index) {
            Some(canonical) => {
                pointers.push(reference.pointer());
                outcome.corrections.push(Correction {
                    location: reference.location,
                    old: reference.stored.to_string(),
                    new: canonical.to_string(),
                });
            }
            None if !index.contains(filename) => outcome.unresolved.push(Unresolved {
                location: reference.location,
                filename: filename.to_string(),
            }),
            None => {}
        }
    }

    for (pointer, correction) in pointers.iter().zip(&outcome.corrections) {
        if let Some(slot) = document.pointer_mut(pointer) {
            *slot = Value::String(correction.new.clone());
        }
    }
    outcome
}

/// Per-file record kept in the run report.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
    pub rewritten: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_error: Option<String>,
}

/// Summary of the reconcile stage over a pipeline tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub documents_scanned: usize,
    pub skipped: Vec<PathBuf>,
    pub files: Vec<FileOutcome>,
}

impl ReconcileReport {
    pub fn corrections(&self) -> usize {
        self.files.iter().map(|f| f.outcome.corrections.len()).sum()
    }

    pub fn unresolved(&self) -> usize {
        self.files.iter().map(|f| f.outcome.unresolved.len()).sum()
    }

    pub fn rewritten(&self) -> usize {
        self.files.iter().filter(|f| f.rewritten).count()
    }
}

/// Reconcile every document under `pipeline_root`.
///
/// With `write` set, corrected documents are saved back in place and a failed
/// save is recorded on that file without stopping the stage. The (possibly
/// corrected) documents are returned alongside the report so check mode can
/// collect references without touching disk.
pub fn reconcile_dir(
    pipeline_root: &Path,
    extension: &str,
    index: &AssetIndex,
    reserved_key: &str,
    write: bool,
) -> Result<(ReconcileReport, Vec<PipelineDocument>), AssetError> {
    let mut report = ReconcileReport::default();
    let mut documents = Vec::new();

    for path in document_paths(pipeline_root, extension)? {
        report.documents_scanned += 1;
        let Some(mut document) = load_or_skip(&path) else {
            report.skipped.push(path);
            continue;
        };

        let file = reconcile_loaded(&mut document, index, reserved_key, write);
        if !file.outcome.corrections.is_empty() || !file.outcome.unresolved.is_empty() {
            report.files.push(file);
        }
        documents.push(document);
    }

    Ok((report, documents))
}

/// Reconcile one loaded document and, with `write` set, save it when dirty.
fn reconcile_loaded(
    document: &mut PipelineDocument,
    index: &AssetIndex,
    reserved_key: &str,
    write: bool,
) -> FileOutcome {
    let outcome = reconcile_document(&mut document.value, index, reserved_key);
    log_outcome(&document.path, &outcome);

    let mut file = FileOutcome {
        path: document.path.clone(),
        rewritten: false,
        write_error: None,
        outcome,
    };
    if write && file.outcome.is_dirty() {
        match document.save() {
            Ok(()) => {
                file.rewritten = true;
                info!(file = %file.path.display(), corrections = file.outcome.corrections.len(), "Pipeline document rewritten");
            }
            Err(e) => {
                warn!(file = %file.path.display(), error = %e, "Failed to write corrected document");
                file.write_error = Some(e.to_string());
            }
        }
    }
    file
}

fn log_outcome(path: &Path, outcome: &DocumentOutcome) {
    for correction in &outcome.corrections {
        info!(
            file = %path.display(),
            location = %display_location(&correction.location),
            old = %correction.old,
            new = %correction.new,
            "Template path corrected"
        );
    }
    for unresolved in &outcome.unresolved {
        warn!(
            file = %path.display(),
            location = %display_location(&unresolved.location),
            filename = %unresolved.filename,
            "Template image not found, keeping original path"
        );
    }
}
