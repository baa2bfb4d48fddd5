mod common;
use common::cli::{MedhistWorkspace, run_medhist, run_medhist_with_stdin};

#[test]
fn test_check_rejects_malformed_file() {
    let workspace = MedhistWorkspace::new();
    workspace.write_file("broken.json", "{ \"activeCount\": 3, \"entries\": [");

    let output = run_medhist(&workspace, ["check", "broken.json"], "check_broken");
    assert!(!output.status.success());
    assert!(output.stdout.contains("ERROR document.parse"));
    assert!(output.stderr.contains("failed validation"));
}

#[test]
fn test_check_warns_on_legacy_inconsistent_file() {
    let workspace = MedhistWorkspace::new();
    workspace.write_file(
        "legacy.json",
        r#"{
  "timestamp": "2024-05-01T12:00:00.000Z",
  "activeCount": 9,
  "diseases": [
    { "id": 1, "name": "Diabetes", "status": "Yes", "since": "2018", "notes": "Type 1", "active": true }
  ]
}"#,
    );

    let output = run_medhist(&workspace, ["--json", "check", "legacy.json"], "check_legacy");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&output.stdout).expect("json");
    assert_eq!(report["ok"], true);
    let checks = report["checks"].as_array().expect("checks");
    assert!(
        checks
            .iter()
            .any(|c| c["name"] == "document.active_count" && c["status"] == "warn")
    );
}

#[test]
fn test_list_of_missing_file_fails() {
    let workspace = MedhistWorkspace::new();
    let output = run_medhist(&workspace, ["list", "nowhere.json"], "list_missing");
    assert!(!output.status.success());
    assert!(output.stderr.contains("Error: File not found"));
}

#[test]
fn test_bad_load_keeps_session_state() {
    let workspace = MedhistWorkspace::new();
    workspace.write_file("notes.txt", "this is not json");

    let output = run_medhist_with_stdin(
        &workspace,
        ["session"],
        "remove 1\nload notes.txt\ncount\nload notes.txt\ncount\n",
        "bad_load",
    );
    assert!(output.status.success());
    assert_eq!(output.stdout.matches("Error loading file").count(), 2);
    assert_eq!(output.stdout.matches("\n10 active\n").count(), 2);
}

#[test]
fn test_session_preload_failure_exits_nonzero() {
    let workspace = MedhistWorkspace::new();
    workspace.write_file("bad.json", "[]");

    let output = run_medhist_with_stdin(&workspace, ["session", "--load", "bad.json"], "", "preload");
    assert!(!output.status.success());
    assert!(output.stderr.contains("Document parse error"));
}
