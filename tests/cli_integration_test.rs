//! CLI round-trips over temporary snapshot and plan files.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn write_fixtures(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let graph_path = dir.path().join("graph.json");
    fs::write(
        &graph_path,
        r#"{
            "components": [
                {"id": "vpc", "criticality": "high"},
                {"id": "db"},
                {"id": "app"}
            ],
            "edges": [
                {"dependent": "db", "dependency": "vpc"},
                {"dependent": "app", "dependency": "db"}
            ]
        }"#,
    )
    .unwrap();

    let plan_path = dir.path().join("plan.json");
    fs::write(
        &plan_path,
        r#"{
            "changes": [
                {"component_id": "vpc", "change_type": "replace"}
            ]
        }"#,
    )
    .unwrap();

    (graph_path, plan_path)
}

#[test]
fn assess_emits_the_json_output_contract() {
    let dir = TempDir::new().unwrap();
    let (graph_path, plan_path) = write_fixtures(&dir);

    let output = Command::cargo_bin("blastmap")
        .unwrap()
        .args(["assess", "--format", "json"])
        .arg("--graph")
        .arg(&graph_path)
        .arg("--plan")
        .arg(&plan_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert!(value["risk_level"].is_string());
    assert!(value["itil_change_type"].is_string());
    assert!(value["approval_required"].is_string());
    assert!(value["final_score"].is_number());
    assert_eq!(value["total_components"], 3);
    assert_eq!(value["affected_components"], 3);
    assert_eq!(value["components"].as_array().unwrap().len(), 3);
    assert_eq!(value["components"][0]["change_type"], "replace");
    assert!(!value["recommendations"].as_array().unwrap().is_empty());
    assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn invalid_change_types_surface_as_warnings_not_failures() {
    let dir = TempDir::new().unwrap();
    let (graph_path, _) = write_fixtures(&dir);
    let plan_path = dir.path().join("bad_plan.json");
    fs::write(
        &plan_path,
        r#"{
            "changes": [
                {"component_id": "db", "change_type": "obliterate"},
                {"component_id": "ghost", "change_type": "delete"}
            ]
        }"#,
    )
    .unwrap();

    let output = Command::cargo_bin("blastmap")
        .unwrap()
        .args(["assess", "--format", "json"])
        .arg("--graph")
        .arg(&graph_path)
        .arg("--plan")
        .arg(&plan_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let warnings = value["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 2);
    let kinds: Vec<&str> = warnings
        .iter()
        .map(|warning| warning["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"invalid_change_type"));
    assert!(kinds.contains(&"unknown_component"));
}

#[test]
fn multiple_plans_produce_a_labeled_array() {
    let dir = TempDir::new().unwrap();
    let (graph_path, plan_path) = write_fixtures(&dir);
    let second_plan = dir.path().join("empty_plan.json");
    fs::write(&second_plan, r#"{"changes": []}"#).unwrap();

    let output = Command::cargo_bin("blastmap")
        .unwrap()
        .args(["assess", "--format", "json"])
        .arg("--graph")
        .arg(&graph_path)
        .arg("--plan")
        .arg(&plan_path)
        .arg("--plan")
        .arg(&second_plan)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let runs = value.as_array().unwrap();

    assert_eq!(runs.len(), 2);
    assert!(runs[0]["plan"].as_str().unwrap().ends_with("plan.json"));
    assert_eq!(runs[1]["risk_level"], "low");
    assert_eq!(runs[1]["final_score"], 0.0);
}

#[test]
fn markdown_report_writes_to_the_output_file() {
    let dir = TempDir::new().unwrap();
    let (graph_path, plan_path) = write_fixtures(&dir);
    let report_path = dir.path().join("report.md");

    Command::cargo_bin("blastmap")
        .unwrap()
        .args(["assess", "--format", "markdown"])
        .arg("--graph")
        .arg(&graph_path)
        .arg("--plan")
        .arg(&plan_path)
        .arg("--output")
        .arg(&report_path)
        .assert()
        .success();

    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.starts_with("# Blastmap Change Risk Assessment"));
    assert!(report.contains("### Affected Components"));
    assert!(report.contains("| vpc | replace |"));
}

#[test]
fn threshold_preset_overrides_classification() {
    let dir = TempDir::new().unwrap();
    let (graph_path, plan_path) = write_fixtures(&dir);

    let run = |preset: &str| -> serde_json::Value {
        let output = Command::cargo_bin("blastmap")
            .unwrap()
            .args(["assess", "--format", "json", "--threshold-preset", preset])
            .arg("--graph")
            .arg(&graph_path)
            .arg("--plan")
            .arg(&plan_path)
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    };

    let strict = run("strict");
    let lenient = run("lenient");
    assert_eq!(strict["final_score"], lenient["final_score"]);

    let order = ["low", "medium", "high", "critical"];
    let rank = |value: &serde_json::Value| {
        order
            .iter()
            .position(|level| *level == value["risk_level"].as_str().unwrap())
            .unwrap()
    };
    assert!(rank(&strict) >= rank(&lenient));
}

#[test]
fn init_writes_a_default_config() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("blastmap")
        .unwrap()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success();

    let config = fs::read_to_string(dir.path().join("blastmap.toml")).unwrap();
    assert!(config.contains("[weights]"));
    assert!(config.contains("[thresholds]"));

    // A second init without --force refuses to overwrite
    Command::cargo_bin("blastmap")
        .unwrap()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .failure();

    Command::cargo_bin("blastmap")
        .unwrap()
        .args(["init", "--force"])
        .current_dir(dir.path())
        .assert()
        .success();
}
