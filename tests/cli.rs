mod common;

use std::fs;

use assert_cmd::Command;
use common::{TestWorkspace, fixture_path};
use predicates::str::contains;
use serde_json::Value;

fn command(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("workbook-schemes").expect("binary exists");
    cmd.env_remove("SCHEMES_PATH")
        .arg("--schemes-dir")
        .arg(workspace.schemes_dir());
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn validate_headers_reports_positions_and_missing() {
    let workspace = TestWorkspace::with_fixture_schemes();
    let output = command(&workspace)
        .args(["validate", "-H", "ID", "-H", "Amount (RUB)", "-H", "Date"])
        .output()
        .expect("run validate");
    assert!(output.status.success());

    let json = stdout_json(&output);
    let data = &json["data"];
    assert_eq!(data["schema"], "payments");
    let columns = data["columns"].as_array().expect("columns");
    let positions = columns
        .iter()
        .map(|c| (c["name"].as_str().unwrap().to_string(), c["position"].as_u64().unwrap()))
        .collect::<Vec<_>>();
    assert_eq!(
        positions,
        vec![
            ("id".to_string(), 1),
            ("amount".to_string(), 2),
            ("date".to_string(), 3)
        ]
    );
    assert_eq!(data["missing"]["required"], Value::Array(Vec::new()));
    assert_eq!(data["missing"]["optional"], Value::Array(Vec::new()));
}

#[test]
fn validate_reads_header_row_from_csv() {
    let workspace = TestWorkspace::with_fixture_schemes();
    let output = command(&workspace)
        .args(["validate", "-i"])
        .arg(fixture_path("erot_header.csv"))
        .args(["--delimiter", ";", "--policy", "strict"])
        .output()
        .expect("run validate");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["data"]["schema"], "erot");
    assert_eq!(json["data"]["columns"][3]["name"], "guid");
    assert_eq!(json["data"]["columns"][3]["position"], 4);
    let optional = json["data"]["missing"]["optional"]
        .as_array()
        .expect("optional");
    assert_eq!(optional.len(), 2);
}

#[test]
fn validate_reads_tsv_by_extension() {
    let workspace = TestWorkspace::with_fixture_schemes();
    command(&workspace)
        .args(["validate", "-i"])
        .arg(fixture_path("payments.tsv"))
        .assert()
        .success()
        .stdout(contains("\"schema\": \"payments\""));
}

#[test]
fn validate_reads_header_row_from_stdin() {
    let workspace = TestWorkspace::with_fixture_schemes();
    let output = command(&workspace)
        .args(["validate", "-i", "-"])
        .write_stdin("ID,Amount,Date\n1,10,2024-01-01\n")
        .output()
        .expect("run validate");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["data"]["schema"], "payments");
    assert_eq!(json["data"]["columns"][1]["name"], "amount");
    assert_eq!(json["data"]["columns"][1]["position"], 2);
}

#[test]
fn unknown_header_prints_error_envelope_and_fails() {
    let workspace = TestWorkspace::with_fixture_schemes();
    let output = command(&workspace)
        .args(["validate", "-H", "ID", "-H", "Extra"])
        .output()
        .expect("run validate");
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["error"], "No scheme matches the document header");
    assert!(json.get("data").is_none());
}

#[test]
fn strict_policy_from_settings_file_rejects_missing_required() {
    let workspace = TestWorkspace::with_fixture_schemes();
    let settings = workspace.write("settings.yml", "policy: strict\n");
    // payments resolves with "amount" missing, since "Date" is optional.
    let output = command(&workspace)
        .arg("--config")
        .arg(&settings)
        .args(["validate", "-H", "ID"])
        .output()
        .expect("run validate");
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["error"], "Missing required columns amount");

    command(&workspace)
        .arg("--config")
        .arg(&settings)
        .args(["validate", "-H", "ID", "--policy", "lenient"])
        .assert()
        .success()
        .stdout(contains("\"amount\""));
}

#[test]
fn empty_store_reports_not_loaded() {
    let workspace = TestWorkspace::new();
    let output = command(&workspace)
        .args(["validate", "-H", "ID"])
        .output()
        .expect("run validate");
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert!(
        json["error"]
            .as_str()
            .expect("error")
            .starts_with("Schemes could not be loaded")
    );
}

#[test]
fn list_and_show_schemes() {
    let workspace = TestWorkspace::with_fixture_schemes();
    command(&workspace)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("erot"))
        .stdout(contains("payments"));

    let output = command(&workspace)
        .args(["show", "payments"])
        .output()
        .expect("run show");
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["header"]["columns"][0]["pattern"], "^ID$");
    assert_eq!(json["header"]["attributes"][0]["name"], "title");

    command(&workspace)
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(contains("Scheme 'missing' not found"));
}

#[test]
fn column_and_attribute_edits_are_persisted() {
    let workspace = TestWorkspace::with_fixture_schemes();
    command(&workspace)
        .args([
            "column", "add", "payments", "--name", "comment", "--pattern", "(?i)^comment",
            "--optional",
        ])
        .assert()
        .success();
    command(&workspace)
        .args([
            "column", "update", "payments", "--name", "date", "--optional", "false",
        ])
        .assert()
        .success();
    command(&workspace)
        .args(["attribute", "update", "payments", "--name", "title", "--index", "2"])
        .assert()
        .success();
    command(&workspace)
        .args(["column", "delete", "payments", "--name", "nope"])
        .assert()
        .failure()
        .stderr(contains("Column 'nope' is not defined"));

    let stored = fs::read_to_string(workspace.schemes_dir().join("payments.json"))
        .expect("read scheme");
    let json: Value = serde_json::from_str(&stored).expect("parse scheme");
    let columns = json["header"]["columns"].as_array().expect("columns");
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[1]["optional"], false);
    assert_eq!(columns[3]["name"], "comment");
    assert!(columns[0].get("regex").is_none());
    assert_eq!(json["header"]["attributes"][0]["index"], 2);
}

#[test]
fn attribute_add_requires_attribute_list() {
    let workspace = TestWorkspace::with_fixture_schemes();
    command(&workspace)
        .args(["attribute", "add", "erot", "--name", "title", "--index", "1"])
        .assert()
        .failure()
        .stderr(contains("Scheme header has no attributes"));
}

#[test]
fn import_migrates_legacy_document() {
    let workspace = TestWorkspace::new();
    let legacy = workspace.write(
        "legacy.json",
        r#"{"name": "legacy", "columns": [{"name": "n", "regex": "^N$", "optional": false, "index": 9}]}"#,
    );
    command(&workspace)
        .arg("import")
        .arg(&legacy)
        .assert()
        .success();
    command(&workspace)
        .arg("import")
        .arg(&legacy)
        .assert()
        .failure()
        .stderr(contains("already exists"));

    let stored = fs::read_to_string(workspace.schemes_dir().join("legacy.json"))
        .expect("read scheme");
    let json: Value = serde_json::from_str(&stored).expect("parse scheme");
    assert_eq!(json["header"]["columns"][0]["pattern"], "^N$");
    assert_eq!(json["schema_version"], "1");
}

#[test]
fn import_rejects_invalid_pattern() {
    let workspace = TestWorkspace::new();
    let broken = workspace.write(
        "broken.json",
        r#"{"name": "broken", "header": {"columns": [{"name": "n", "pattern": "(", "optional": false}]}}"#,
    );
    command(&workspace)
        .arg("import")
        .arg(&broken)
        .assert()
        .failure()
        .stderr(contains("invalid pattern"));
    assert!(!workspace.schemes_dir().join("broken.json").exists());
}
