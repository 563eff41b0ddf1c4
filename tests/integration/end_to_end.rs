use std::fs;

use maa_assets::config::{AssetsConfig, DuplicatePolicy};
use maa_assets::{AssetError, MaintenanceRun, RunMode};
use serde_json::json;

use crate::integration::support::{hero_workspace, read, write_file};

#[test]
fn stale_reference_is_repaired_and_orphan_quarantined() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    let config = AssetsConfig::default();

    let report = MaintenanceRun::new(&config, root)
        .execute(RunMode::Apply)
        .unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&read(root, "MaaYYs/pipeline/battle.json")).unwrap();
    assert_eq!(
        document,
        json!({"Fight": {"recognition": "TemplateMatch", "template": "chars/hero.png"}})
    );

    assert!(root.join("MaaYYs/image/chars/hero.png").exists());
    assert!(!root.join("MaaYYs/image/orphan.png").exists());
    assert_eq!(
        fs::read(root.join("unused/orphan.png")).unwrap(),
        b"orphan"
    );

    // Backups hold the pre-run state
    assert!(read(root, "backup_pipeline/battle.json").contains("old/hero.png"));
    assert!(root.join("backup_image/orphan.png").exists());

    assert_eq!(report.reconcile.corrections(), 1);
    assert_eq!(report.reconcile.rewritten(), 1);
    assert_eq!(report.referenced, 1);
    assert_eq!(report.quarantine.scanned, 2);
    assert_eq!(report.quarantine.moved.len(), 1);
}

#[test]
fn second_run_changes_nothing() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    let config = AssetsConfig::default();

    MaintenanceRun::new(&config, root)
        .execute(RunMode::Apply)
        .unwrap();
    let after_first = read(root, "MaaYYs/pipeline/battle.json");

    let report = MaintenanceRun::new(&config, root)
        .execute(RunMode::Apply)
        .unwrap();
    assert_eq!(report.reconcile.corrections(), 0);
    assert_eq!(report.reconcile.rewritten(), 0);
    assert!(report.quarantine.moved.is_empty());
    assert_eq!(read(root, "MaaYYs/pipeline/battle.json"), after_first);
    // The first run's quarantine survives the second backup
    assert!(root.join("unused/orphan.png").exists());
    assert!(!root.join("backup_image/orphan.png").exists());
}

#[test]
fn quarantined_bytes_survive_a_same_named_image_folder() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    let config = AssetsConfig::default();

    MaintenanceRun::new(&config, root)
        .execute(RunMode::Apply)
        .unwrap();
    assert_eq!(fs::read(root.join("unused/orphan.png")).unwrap(), b"orphan");

    write_file(root, "MaaYYs/image/unused/orphan.png", b"NEW");
    write_file(
        root,
        "MaaYYs/pipeline/loot.json",
        br#"{"Loot": {"template": "unused/orphan.png"}}"#,
    );
    let report = MaintenanceRun::new(&config, root)
        .execute(RunMode::Apply)
        .unwrap();

    assert!(report.quarantine.moved.is_empty());
    assert_eq!(fs::read(root.join("unused/orphan.png")).unwrap(), b"orphan");
    assert_eq!(fs::read_dir(root.join("unused")).unwrap().count(), 1);
    assert_eq!(
        fs::read(root.join("MaaYYs/image/unused/orphan.png")).unwrap(),
        b"NEW"
    );
    // The image backup is a clean snapshot of the source tree
    assert_eq!(
        fs::read(root.join("backup_image/unused/orphan.png")).unwrap(),
        b"NEW"
    );
}

#[test]
fn quarantine_layouts_a_backup_would_wipe_are_rejected() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();

    let mut dot = AssetsConfig::default();
    dot.quarantine.subdir_name = ".".to_string();
    assert!(dot.validate().is_err());
    let err = MaintenanceRun::new(&dot, root)
        .execute(RunMode::Apply)
        .unwrap_err();
    assert!(matches!(err, AssetError::ConfigError(_)));

    let mut inside_pipeline_backup = AssetsConfig::default();
    inside_pipeline_backup.quarantine.root = Some("backup_pipeline".into());
    let err = MaintenanceRun::new(&inside_pipeline_backup, root)
        .execute(RunMode::Apply)
        .unwrap_err();
    assert!(matches!(err, AssetError::ConfigError(_)));

    assert!(root.join("MaaYYs/image/orphan.png").exists());
    assert!(!root.join("backup_image").exists());
    assert!(!root.join("backup_pipeline").exists());
}

#[test]
fn documents_without_references_keep_their_bytes() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    let untouched = "{\"Idle\":{\"action\":\"Click\",\"next\":[\"Fight\"]}}";
    write_file(root, "MaaYYs/pipeline/idle.json", untouched.as_bytes());
    write_file(root, "MaaYYs/pipeline/broken.json", b"{\"oops\": ");

    let report = MaintenanceRun::new(&AssetsConfig::default(), root)
        .execute(RunMode::Apply)
        .unwrap();

    assert_eq!(read(root, "MaaYYs/pipeline/idle.json"), untouched);
    assert_eq!(read(root, "MaaYYs/pipeline/broken.json"), "{\"oops\": ");
    assert_eq!(report.reconcile.documents_scanned, 3);
    assert_eq!(report.reconcile.skipped.len(), 1);
}

#[test]
fn unresolved_reference_is_left_alone_and_list_references_protect_assets() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    write_file(root, "MaaYYs/image/ui/ok.png", b"ok");
    write_file(
        root,
        "MaaYYs/pipeline/menu.json",
        r#"{"Menu": {"template": ["ok.png", "gone/missing.png"]}}"#.as_bytes(),
    );

    let report = MaintenanceRun::new(&AssetsConfig::default(), root)
        .execute(RunMode::Apply)
        .unwrap();

    let menu: serde_json::Value =
        serde_json::from_str(&read(root, "MaaYYs/pipeline/menu.json")).unwrap();
    assert_eq!(menu["Menu"]["template"], json!(["ui/ok.png", "gone/missing.png"]));
    assert!(root.join("MaaYYs/image/ui/ok.png").exists());
    assert_eq!(report.reconcile.unresolved(), 1);
}

#[test]
fn quarantine_conserves_every_asset() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    write_file(root, "MaaYYs/image/a/dup.png", b"a");
    write_file(root, "MaaYYs/image/b/dup.png", b"b");
    write_file(root, "MaaYYs/image/c/x.jpg", b"x");

    let report = MaintenanceRun::new(&AssetsConfig::default(), root)
        .execute(RunMode::Apply)
        .unwrap();

    let remaining = walk_count(&root.join("MaaYYs/image"));
    assert_eq!(report.quarantine.scanned, 5);
    assert_eq!(remaining + report.quarantine.moved.len(), 5);
    assert_eq!(report.duplicates.len(), 1);

    let quarantine = root.join("unused");
    assert_eq!(fs::read(quarantine.join("dup.png")).unwrap(), b"a");
    assert_eq!(fs::read(quarantine.join("dup_1.png")).unwrap(), b"b");
    assert!(quarantine.join("x.jpg").exists());
}

#[test]
fn duplicate_error_policy_aborts_before_documents_change() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    write_file(root, "MaaYYs/image/other/hero.png", b"hero2");
    let mut config = AssetsConfig::default();
    config.scan.duplicate_policy = DuplicatePolicy::Error;

    let err = MaintenanceRun::new(&config, root)
        .execute(RunMode::Apply)
        .unwrap_err();
    assert!(matches!(err, AssetError::DuplicateAsset { .. }));
    assert!(read(root, "MaaYYs/pipeline/battle.json").contains("old/hero.png"));
    assert!(root.join("MaaYYs/image/orphan.png").exists());
}

fn walk_count(dir: &std::path::Path) -> usize {
    let mut count = 0;
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        if entry.file_type().unwrap().is_dir() {
            count += walk_count(&entry.path());
        } else {
            count += 1;
        }
    }
    count
}
