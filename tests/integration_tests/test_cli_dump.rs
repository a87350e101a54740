// integration tests for the dump command

use crate::common::*;
use std::fs;

#[test]
fn test_dump_text_shows_dnf() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let output = run_scriptcond(dir.path(), &["--no-json", "dump", file.to_str().unwrap()]);
    let stdout = stdout_of(&output);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout.contains("Attack [active, one-shot]"), "stdout: {}", stdout);
    assert!(stdout.contains("# send the raiders"));
    assert!(stdout.contains(
        "IF (TEAM_HAS_UNITS(\"Raiders\") AND PLAYER_ALL_DESTROYED(\"SkirmishTemplate\")) OR (COUNTER(\"waves\", >=, 2))"
    ));
    assert!(stdout.contains("Retreat [active]"));
    assert!(stdout.contains("IF (TEAM_DESTROYED(\"<This Team>\"))"));
}

#[test]
fn test_dump_json_structure() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let output = run_scriptcond(dir.path(), &["--json", "dump", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let json = json_of(&output);
    assert_eq!(json["jsonrpc"], "2.0");

    let scripts = json["result"]["scripts"].as_array().unwrap();
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0]["name"], "Attack");
    assert_eq!(scripts[0]["clauses"].as_array().unwrap().len(), 2);

    let first = &scripts[0]["clauses"][0]["conditions"][0];
    assert_eq!(first["type"], 10);
    assert_eq!(first["name"], "TEAM_HAS_UNITS");
    assert_eq!(first["params"][0]["kind"], "team");
    assert_eq!(first["params"][0]["string"], "Raiders");

    assert_eq!(scripts[1]["one_shot"], false);
}

#[test]
fn test_dump_piped_defaults_to_json() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    // stdout is a pipe under the test harness
    let output = run_scriptcond(dir.path(), &["dump", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(json_of(&output)["jsonrpc"], "2.0");
}

#[test]
fn test_dump_quiet_prints_nothing() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let output = run_scriptcond(dir.path(), &["-q", "dump", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_dump_empty_file_has_no_scripts() {
    let dir = test_dir();
    let file = dir.path().join("empty.scb");
    write_chunk_file(&file, |_| {});

    let output = run_scriptcond(dir.path(), &["--json", "dump", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        json_of(&output)["result"]["scripts"].as_array().unwrap().len(),
        0
    );
}

#[test]
fn test_dump_bad_magic_is_parse_error() {
    let dir = test_dir();
    let file = dir.path().join("garbage.scb");
    fs::write(&file, b"not a chunk file at all").unwrap();

    let output = run_scriptcond(dir.path(), &["--no-json", "dump", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(8));
    assert!(stderr_of(&output).contains("failed to parse"));
}

#[test]
fn test_dump_unknown_condition_type_json_error() {
    let dir = test_dir();
    let file = dir.path().join("unknown.scb");
    write_chunk_file(&file, |out| {
        out.open_data_chunk("Script", 1);
        out.write_ascii_string("Broken");
        out.write_ascii_string("");
        out.write_byte(1);
        out.write_byte(1);
        out.write_byte(0);
        out.open_data_chunk("OrCondition", 1);
        out.open_data_chunk("Condition", 1);
        out.write_i32(999);
        out.write_i32(0);
        out.close_data_chunk();
        out.close_data_chunk();
        out.close_data_chunk();
    });

    let output = run_scriptcond(dir.path(), &["--json", "dump", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(8));

    let json = json_of(&output);
    assert_eq!(json["error"]["code"], -32008);
    assert!(json["error"]["data"]["details"]
        .as_str()
        .unwrap()
        .contains("unknown condition type: 999"));
}

#[test]
fn test_dump_missing_file() {
    let dir = test_dir();
    let missing = dir.path().join("missing.scb");

    let output = run_scriptcond(dir.path(), &["--no-json", "dump", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("failed to read"));
}

#[test]
fn test_dump_uses_config_condition_types() {
    let dir = test_dir();
    let file = dir.path().join("custom.scb");
    write_chunk_file(&file, |out| {
        out.open_data_chunk("Script", 1);
        out.write_ascii_string("Custom");
        out.write_ascii_string("");
        out.write_byte(1);
        out.write_byte(1);
        out.write_byte(0);
        out.open_data_chunk("OrCondition", 1);
        out.open_data_chunk("Condition", 4);
        out.write_i32(100);
        out.write_ascii_string("BRIDGE_DOWN");
        out.write_i32(1);
        out.write_i32(26); // bridge
        out.write_i32(0);
        out.write_real(0.0);
        out.write_ascii_string("North Bridge");
        out.close_data_chunk();
        out.close_data_chunk();
        out.close_data_chunk();
    });

    // unknown without the config
    let output = run_scriptcond(dir.path(), &["--no-json", "dump", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(8));

    fs::write(
        dir.path().join("config.json"),
        r#"{ condition_types: [{ id: 100, name: "BRIDGE_DOWN", params: ["bridge"] }] }"#,
    )
    .unwrap();

    let output = run_scriptcond(dir.path(), &["--no-json", "dump", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("IF (BRIDGE_DOWN(\"North Bridge\"))"));
}

#[test]
fn test_dump_verbose_logs_to_stderr() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let output = run_scriptcond(
        dir.path(),
        &["--no-json", "-v", "dump", file.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(stderr_of(&output).contains("parsed script"));
    assert!(!stdout_of(&output).contains("parsed script"));
}
