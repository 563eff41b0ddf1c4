//! Reference set collection (second pass, after corrections).

use crate::error::AssetError;
use crate::pipeline::{basename, document_paths, load_or_skip, references};
use crate::types::ReferenceSet;
use serde_json::Value;
use std::path::Path;

/// Basenames referenced by any of `documents`.
pub fn collect_from_documents<'a>(
    documents: impl IntoIterator<Item = &'a Value>,
    reserved_key: &str,
) -> ReferenceSet {
    let mut set = ReferenceSet::new();
    for document in documents {
        set.extend(
            references(document, reserved_key).map(|r| basename(r.stored).to_string()),
        );
    }
    set
}

/// Re-read every document under `pipeline_root` and collect referenced basenames.
/// Unparsable documents contribute nothing.
pub fn collect_from_dir(
    pipeline_root: &Path,
    extension: &str,
    reserved_key: &str,
) -> Result<ReferenceSet, AssetError> {
    let documents: Vec<_> = document_paths(pipeline_root, extension)?
        .iter()
        .filter_map(|path| load_or_skip(path))
        .collect();
    let set = collect_from_documents(documents.iter().map(|d| &d.value), reserved_key);
    tracing::debug!(root = %pipeline_root.display(), referenced = set.len(), "Reference set collected");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collects_flattened_basenames_across_documents() {
        let a = json!({ "x": { "template": "chars/hero.png" } });
        let b = json!({ "y": { "template": ["a/b.png", "c.png"] }, "z": { "template": "chars/hero.png" } });
        let set = collect_from_documents([&a, &b], "template");
        let expected: Vec<&str> = vec!["b.png", "c.png", "hero.png"];
        assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_collect_from_dir_ignores_malformed_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("ok.json"), r#"{"n": {"template": "img/ok.png"}}"#).unwrap();
        fs::write(root.join("bad.json"), r#"{"n": {"template": "img/bad.png""#).unwrap();

        let set = collect_from_dir(root, "json", "template").unwrap();
        assert!(set.contains("ok.png"));
        assert!(!set.contains("bad.png"));
        assert_eq!(set.len(), 1);
    }
}
