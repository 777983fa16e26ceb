//! End-to-end tests for the `sheetgantt` binary

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn sheetgantt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sheetgantt"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SHEETGANTT_CONFIG")
        .output()
        .expect("failed to execute sheetgantt")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn path_str(path: &std::path::Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn text_render_lists_every_row() {
    let csv = fixture("office_move.csv");
    let out = stdout(&sheetgantt(&["render", path_str(&csv), "--format", "text", "--today", "2025-03-20"]));

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].starts_with("Timeline: 2025-02-01 to 2025-06-29"));
    assert_eq!(lines[1], "[-]   10 Office move  day 30 +59d");
    assert_eq!(lines[7], "Connectors: 4");
}

#[test]
fn collapse_flag_hides_children_and_connectors() {
    let csv = fixture("office_move.csv");
    let out = stdout(&sheetgantt(&[
        "render",
        path_str(&csv),
        "--format",
        "text",
        "--collapse",
        "12",
    ]));

    assert!(!out.contains("Wiring"));
    assert!(!out.contains("Furniture"));
    assert!(out.contains("Go-live"));
    assert!(out.ends_with("Connectors: 1\n"));
}

#[test]
fn collapse_all_with_transitive_strategy_leaves_the_root() {
    let csv = fixture("office_move.csv");
    let out = stdout(&sheetgantt(&[
        "render",
        path_str(&csv),
        "--format",
        "text",
        "--collapse-all",
        "--strategy",
        "transitive",
    ]));

    let rows: Vec<&str> = out.lines().skip(1).collect();
    assert_eq!(rows, vec!["[+]   10 Office move  day 30 +59d", "Connectors: 0"]);
}

#[test]
fn unknown_collapse_id_still_renders() {
    let csv = fixture("office_move.csv");
    let out = stdout(&sheetgantt(&["render", path_str(&csv), "--format", "text", "--collapse", "99"]));
    assert!(out.ends_with("Connectors: 4\n"));
}

#[test]
fn json_sheet_matches_csv_sheet() {
    let csv = stdout(&sheetgantt(&["render", path_str(&fixture("office_move.csv")), "--format", "text"]));
    let json = stdout(&sheetgantt(&["render", path_str(&fixture("office_move.json")), "--format", "text"]));
    assert_eq!(csv, json);
}

#[test]
fn html_and_svg_are_written_to_files() {
    let dir = tempfile::tempdir().unwrap();
    let html_path = dir.path().join("chart.html");
    let svg_path = dir.path().join("chart.svg");
    let csv = fixture("office_move.csv");

    stdout(&sheetgantt(&["render", path_str(&csv), "-o", path_str(&html_path), "--dark"]));
    stdout(&sheetgantt(&["render", path_str(&csv), "-f", "svg", "-o", path_str(&svg_path)]));

    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>office_move</title>"));
    assert_eq!(html.matches(r#"class="dep-arrow""#).count(), 4);

    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("<svg"));
    assert_eq!(svg.matches("marker-end=").count(), 4);
}

#[test]
fn config_file_sets_strategy_and_title() {
    let csv = fixture("office_move.csv");
    let config = fixture("layout.toml");

    let text = stdout(&sheetgantt(&[
        "--config",
        path_str(&config),
        "render",
        path_str(&csv),
        "--format",
        "text",
        "--collapse",
        "10",
    ]));
    assert_eq!(text.lines().count(), 3);

    let html = stdout(&sheetgantt(&["--config", path_str(&config), "render", path_str(&csv)]));
    assert!(html.contains("<title>Relocation</title>"));
}

#[test]
fn flag_overrides_config_strategy() {
    let csv = fixture("office_move.csv");
    let config = fixture("layout.toml");
    let text = stdout(&sheetgantt(&[
        "--config",
        path_str(&config),
        "render",
        path_str(&csv),
        "--format",
        "text",
        "--collapse",
        "10",
        "--strategy",
        "single-level",
    ]));
    // Fit-out stays visible and expanded, so its children do too
    assert!(text.contains("Wiring"));
    assert!(!text.contains("Survey"));
}

#[test]
fn layout_dump_is_valid_json() {
    let csv = fixture("office_move.csv");
    let out = stdout(&sheetgantt(&["layout", path_str(&csv), "--today", "2025-03-20"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["today"], "2025-03-20");
    assert_eq!(value["tasks"].as_array().unwrap().len(), 6);
    assert_eq!(value["rows"].as_array().unwrap().len(), 6);
    assert_eq!(value["edges"].as_array().unwrap().len(), 4);
    assert_eq!(value["connectors"].as_array().unwrap().len(), 4);
    assert_eq!(value["rows"][1]["row_top"], 28.0);
    assert_eq!(value["timeline"]["min_date"], "2025-02-01");
}

#[test]
fn missing_input_fails_with_message() {
    let output = sheetgantt(&["render", "/nonexistent/plan.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load task sheet"));
}

#[test]
fn upload_then_download_returns_file_url() {
    let store = tempfile::tempdir().unwrap();
    let csv = fixture("office_move.csv");

    let url = stdout(&sheetgantt(&["upload", path_str(&csv), "--store", path_str(store.path())]));
    assert!(url.trim().starts_with("file://"));
    assert!(url.trim().ends_with("current.csv"));

    let downloaded = stdout(&sheetgantt(&["download", "--store", path_str(store.path())]));
    assert_eq!(downloaded, url);

    let stored = std::fs::read_to_string(store.path().join("current.csv")).unwrap();
    assert_eq!(stored, std::fs::read_to_string(&csv).unwrap());
}

#[test]
fn uploading_json_replaces_csv_document() {
    let store = tempfile::tempdir().unwrap();
    stdout(&sheetgantt(&["upload", path_str(&fixture("office_move.csv")), "--store", path_str(store.path())]));
    stdout(&sheetgantt(&["upload", path_str(&fixture("office_move.json")), "--store", path_str(store.path())]));

    assert!(!store.path().join("current.csv").exists());
    let url = stdout(&sheetgantt(&["download", "--store", path_str(store.path())]));
    assert!(url.trim().ends_with("current.json"));
}

#[test]
fn download_from_empty_store_fails() {
    let store = tempfile::tempdir().unwrap();
    let output = sheetgantt(&["download", "--store", path_str(store.path())]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no document has been uploaded"));
}

#[test]
fn unreadable_upload_keeps_previous_document() {
    let store = tempfile::tempdir().unwrap();
    let bad = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::fs::write(bad.path(), "{\"not\": \"rows\"}").unwrap();

    stdout(&sheetgantt(&["upload", path_str(&fixture("office_move.csv")), "--store", path_str(store.path())]));
    let output = sheetgantt(&["upload", path_str(bad.path()), "--store", path_str(store.path())]);
    assert!(!output.status.success());
    assert!(store.path().join("current.csv").exists());
}
