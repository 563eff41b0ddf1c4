use maa_assets::tooling::cli::{CliContext, Commands, PathOverrides};

use crate::integration::support::{hero_workspace, read, write_file};

#[test]
fn check_json_reports_without_touching_files() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    let cli = CliContext::new(root.to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Check {
            format: "json".to_string(),
            paths: PathOverrides::default(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["mode"], "check");
    assert_eq!(parsed["indexed_assets"], 2);
    assert_eq!(parsed["referenced"], 1);
    assert_eq!(parsed["unused_candidates"].as_array().unwrap().len(), 1);
    let corrections = parsed["reconcile"]["files"][0]["corrections"]
        .as_array()
        .unwrap();
    assert_eq!(corrections[0]["old"], "old/hero.png");
    assert_eq!(corrections[0]["new"], "chars/hero.png");

    assert!(read(root, "MaaYYs/pipeline/battle.json").contains("old/hero.png"));
    assert!(root.join("MaaYYs/image/orphan.png").exists());
    assert!(!root.join("backup_pipeline").exists());
}

#[test]
fn run_text_uses_workspace_config_file() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    write_file(
        root,
        "maa-assets.toml",
        b"[quarantine]\nsubdir_name = \"review\"\n",
    );
    let cli = CliContext::new(root.to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Run {
            format: "text".to_string(),
            paths: PathOverrides::default(),
        })
        .unwrap();

    assert!(output.contains("Corrections"));
    assert!(output.contains("chars/hero.png"));
    assert!(root.join("review/orphan.png").exists());
}

#[test]
fn path_overrides_redirect_the_run() {
    let temp_dir = hero_workspace();
    let root = temp_dir.path();
    write_file(root, "alt/images/solo.png", b"solo");
    write_file(root, "alt/pipeline/p.json", br#"{"N": {"template": "solo.png"}}"#);
    let cli = CliContext::new(root.to_path_buf(), None).unwrap();

    let output = cli
        .execute(&Commands::Index {
            format: "json".to_string(),
            paths: PathOverrides {
                image_dir: Some("alt/images".into()),
                ..PathOverrides::default()
            },
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["entries"]["solo.png"], "solo.png");

    cli.execute(&Commands::Run {
        format: "json".to_string(),
        paths: PathOverrides {
            image_dir: Some("alt/images".into()),
            pipeline_dir: Some("alt/pipeline".into()),
            backup_image_dir: Some("alt/backup_images".into()),
            backup_pipeline_dir: Some("alt/backup_pipeline".into()),
            quarantine_name: None,
        },
    })
    .unwrap();
    assert!(root.join("alt/images/solo.png").exists());
    assert!(root.join("alt/backup_images/solo.png").exists());
    // The default layout was not touched
    assert!(root.join("MaaYYs/image/orphan.png").exists());
}

#[test]
fn missing_config_file_is_an_error() {
    let temp_dir = hero_workspace();
    let result = CliContext::new(
        temp_dir.path().to_path_buf(),
        Some(temp_dir.path().join("nope.toml")),
    );
    assert!(result.is_err());
}

#[test]
fn plugins_text_lists_builtin_recognizer() {
    let temp_dir = hero_workspace();
    let cli = CliContext::new(temp_dir.path().to_path_buf(), None).unwrap();
    let output = cli
        .execute(&Commands::Plugins {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("MyRecognizer"));
    assert!(output.contains("recognition"));
    assert!(output.contains("Agent socket: 111-222-333-444"));
}
