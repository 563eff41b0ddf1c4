use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Workspace with the default MaaYYs layout:
/// - image/chars/hero.png (referenced through a stale path)
/// - image/orphan.png (referenced nowhere)
/// - pipeline/battle.json referencing hero.png
pub fn hero_workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_file(root, "MaaYYs/image/chars/hero.png", b"hero");
    write_file(root, "MaaYYs/image/orphan.png", b"orphan");
    write_file(
        root,
        "MaaYYs/pipeline/battle.json",
        r#"{"Fight": {"recognition": "TemplateMatch", "template": "old/hero.png"}}"#.as_bytes(),
    );
    temp_dir
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}
