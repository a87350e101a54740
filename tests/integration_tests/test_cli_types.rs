// integration tests for the types command

use crate::common::*;
use std::fs;

#[test]
fn test_types_lists_builtin_table() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["--json", "types"]);
    assert!(output.status.success());

    let types = json_of(&output)["result"]["types"].as_array().unwrap().clone();
    assert_eq!(types.len(), 19);
    assert_eq!(types[0]["name"], "CONDITION_FALSE");
    assert_eq!(types[1]["name"], "COUNTER");
    assert_eq!(
        types[1]["params"],
        serde_json::json!(["counter", "comparison", "int"])
    );
}

#[test]
fn test_types_text_row() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["--no-json", "types", "TEAM_STATE_IS"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output).trim(),
        "11  TEAM_STATE_IS(team, team_state)"
    );
}

#[test]
fn test_types_lookup_by_id() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["--json", "types", "8"]);
    assert!(output.status.success());
    assert_eq!(
        json_of(&output)["result"]["types"][0]["name"],
        "TEAM_DESTROYED"
    );
}

#[test]
fn test_types_not_found_suggests() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["--json", "types", "TEAM_DESTROYD"]);
    assert_eq!(output.status.code(), Some(9));

    let json = json_of(&output);
    assert_eq!(json["error"]["code"], -32009);
    let suggestions = json["error"]["data"]["suggestions"].as_array().unwrap();
    assert_eq!(suggestions[0], "TEAM_DESTROYED");
}

#[test]
fn test_types_not_found_text() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["--no-json", "types", "FLAGG"]);
    assert_eq!(output.status.code(), Some(9));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("condition type 'FLAGG' not found"));
    assert!(stderr.contains("Did you mean: FLAG"));
}

#[test]
fn test_types_without_builtin() {
    let dir = test_dir();
    fs::write(
        dir.path().join("config.json"),
        r#"{
            "condition_types": [{"id": 7, "name": "ONLY_ONE", "params": ["waypoint"]}],
            "settings": {"include_builtin_types": false}
        }"#,
    )
    .unwrap();

    let output = run_scriptcond(dir.path(), &["--json", "types"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let types = json_of(&output)["result"]["types"].as_array().unwrap().clone();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0]["name"], "ONLY_ONE");
}
