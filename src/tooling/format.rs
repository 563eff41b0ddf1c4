//! Format maintenance, index and plugin reports as text.

use crate::assets::AssetIndex;
use crate::maintenance::{MaintenanceReport, RunMode};
use crate::pipeline::walker::display_location;
use crate::plugin::PluginEntry;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::Path;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    table
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Format a maintenance report as human-readable text.
pub fn format_maintenance_report_text(report: &MaintenanceReport) -> String {
    let mut out = String::new();
    let title = match report.mode {
        RunMode::Apply => "Maintenance Run",
        RunMode::Check => "Maintenance Check (no changes made)",
    };
    out.push_str(&format!("{}\n\n", format_section_heading(title)));

    let mut summary = table(vec!["Stage", "Result"]);
    for backup in &report.backups {
        summary.add_row(vec![
            format!("Backup {}", backup.source.display()),
            format!("{} files -> {}", backup.files, backup.destination.display()),
        ]);
    }
    summary.add_row(vec!["Indexed assets".to_string(), report.indexed_assets.to_string()]);
    summary.add_row(vec!["Duplicate filenames".to_string(), report.duplicates.len().to_string()]);
    summary.add_row(vec![
        "Documents scanned".to_string(),
        report.reconcile.documents_scanned.to_string(),
    ]);
    summary.add_row(vec![
        "Documents skipped".to_string(),
        report.reconcile.skipped.len().to_string(),
    ]);
    summary.add_row(vec!["Corrections".to_string(), report.reconcile.corrections().to_string()]);
    summary.add_row(vec!["Unresolved".to_string(), report.reconcile.unresolved().to_string()]);
    summary.add_row(vec![
        "Documents rewritten".to_string(),
        report.reconcile.rewritten().to_string(),
    ]);
    summary.add_row(vec!["Referenced images".to_string(), report.referenced.to_string()]);
    match report.mode {
        RunMode::Apply => {
            summary.add_row(vec![
                "Moved to quarantine".to_string(),
                report.quarantine.moved.len().to_string(),
            ]);
            if !report.quarantine.failed.is_empty() {
                summary.add_row(vec![
                    "Failed moves".to_string(),
                    report.quarantine.failed.len().to_string(),
                ]);
            }
        }
        RunMode::Check => {
            summary.add_row(vec![
                "Would quarantine".to_string(),
                report.unused_candidates.len().to_string(),
            ]);
        }
    }
    out.push_str(&format!("{}\n\n", summary));

    let pipeline_dir = &report.paths.pipeline_dir;
    let corrections: Vec<_> = report
        .reconcile
        .files
        .iter()
        .flat_map(|f| f.outcome.corrections.iter().map(move |c| (&f.path, c)))
        .collect();
    if !corrections.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Corrections")));
        let mut t = table(vec!["File", "Location", "Old", "New"]);
        for (path, c) in corrections {
            t.add_row(vec![
                relative(path, pipeline_dir),
                display_location(&c.location),
                c.old.clone(),
                c.new.clone(),
            ]);
        }
        out.push_str(&format!("{}\n\n", t));
    }

    let unresolved: Vec<_> = report
        .reconcile
        .files
        .iter()
        .flat_map(|f| f.outcome.unresolved.iter().map(move |u| (&f.path, u)))
        .collect();
    if !unresolved.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Missing images")));
        let mut t = table(vec!["File", "Location", "Filename"]);
        for (path, u) in unresolved {
            t.add_row(vec![
                relative(path, pipeline_dir),
                display_location(&u.location),
                u.filename.clone(),
            ]);
        }
        out.push_str(&format!("{}\n\n", t));
    }

    if !report.duplicates.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Duplicate filenames")));
        let mut t = table(vec!["Filename", "Kept", "Shadowed"]);
        for d in &report.duplicates {
            t.add_row(vec![d.filename.clone(), d.kept.clone(), d.shadowed.clone()]);
        }
        out.push_str(&format!("{}\n\n", t));
    }

    let image_dir = &report.paths.image_dir;
    if !report.quarantine.moved.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Quarantined")));
        let mut t = table(vec!["From", "To"]);
        for m in &report.quarantine.moved {
            t.add_row(vec![relative(&m.from, image_dir), m.to.display().to_string()]);
        }
        out.push_str(&format!("{}\n\n", t));
    }
    if !report.unused_candidates.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Unreferenced")));
        let mut t = table(vec!["Image"]);
        for path in &report.unused_candidates {
            t.add_row(vec![relative(path, image_dir)]);
        }
        out.push_str(&format!("{}\n\n", t));
    }

    out.push_str(&format!("Finished in {} ms.\n", report.elapsed_ms));
    out
}

/// Format the asset index as human-readable text.
pub fn format_index_text(index: &AssetIndex) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Asset Index")));
    if index.is_empty() {
        out.push_str("No images found.\n");
        return out;
    }
    let mut t = table(vec!["Filename", "Path"]);
    for (filename, path) in index.iter() {
        t.add_row(vec![filename, path]);
    }
    out.push_str(&format!("{}\n\n", t));
    out.push_str(&format!(
        "Total: {} images, {} duplicate filenames.\n",
        index.len(),
        index.duplicates().len()
    ));
    out
}

/// Format registered plugins as human-readable text.
pub fn format_plugins_text(entries: &[PluginEntry], socket_id: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Plugins")));
    out.push_str(&format!("Agent socket: {}\n\n", socket_id));
    if entries.is_empty() {
        out.push_str("No plugins registered.\n");
        return out;
    }
    let mut t = table(vec!["Name", "Kind"]);
    for entry in entries {
        t.add_row(vec![entry.name.to_string(), entry.kind.to_string()]);
    }
    out.push_str(&format!("{}\n\n", t));
    out.push_str(&format!("Total: {} plugins.\n", entries.len()));
    out
}
