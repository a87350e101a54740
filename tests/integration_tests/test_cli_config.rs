// integration tests for the config command

use crate::common::*;
use std::fs;
use std::path::{Path, PathBuf};

fn write_config(dir: &Path, content: &serde_json::Value) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(content).unwrap())
        .expect("Failed to write test config");
    path
}

// ============================================================================
// config show tests
// ============================================================================

#[test]
fn test_config_show_defaults_without_file() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["config", "show"]);
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(config["settings"]["include_builtin_types"], true);
    assert_eq!(config["settings"]["log_level"], "warn");
    // show never creates the file
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn test_config_show_with_override_path() {
    let dir = test_dir();
    let other = dir.path().join("other.json");
    fs::write(&other, r#"{"settings": {"log_level": "info"}}"#).unwrap();

    let output = run_scriptcond(
        dir.path(),
        &["--config", other.to_str().unwrap(), "config", "show"],
    );
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(config["settings"]["log_level"], "info");
}

#[test]
fn test_config_path_uses_env() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output).trim(),
        dir.path().join("config.json").display().to_string()
    );
}

// ============================================================================
// config verify tests
// ============================================================================

#[test]
fn test_config_verify_valid() {
    let dir = test_dir();
    write_config(
        dir.path(),
        &serde_json::json!({
            "condition_types": [{"id": 100, "name": "CUSTOM", "params": ["unit"]}]
        }),
    );

    let output = run_scriptcond(dir.path(), &["--no-json", "config", "verify"]);
    assert!(output.status.success(), "stdout: {}", stdout_of(&output));
    assert!(stdout_of(&output).contains("Configuration is valid"));
}

#[test]
fn test_config_verify_reports_errors() {
    let dir = test_dir();
    write_config(
        dir.path(),
        &serde_json::json!({
            "condition_types": [
                {"id": 100, "name": "DUP"},
                {"id": 101, "name": "DUP"}
            ]
        }),
    );

    let output = run_scriptcond(dir.path(), &["--no-json", "config", "verify"]);
    let stdout = stdout_of(&output);
    assert_eq!(output.status.code(), Some(5));
    assert!(stdout.contains("1 error(s)"), "stdout: {}", stdout);
    assert!(stdout.contains("condition_types[1]: duplicate name 'DUP'"));
}

#[test]
fn test_config_verify_missing_file() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["--no-json", "config", "verify"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_of(&output).contains("config file not found"));
}

#[test]
fn test_config_default_passes_verify() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["config", "default"]);
    assert!(output.status.success());
    fs::write(dir.path().join("config.json"), stdout_of(&output)).unwrap();

    let output = run_scriptcond(dir.path(), &["--no-json", "config", "verify"]);
    assert!(output.status.success(), "stdout: {}", stdout_of(&output));
}

#[test]
fn test_broken_config_fails_commands() {
    let dir = test_dir();
    fs::write(dir.path().join("config.json"), "{ this is not json").unwrap();

    let output = run_scriptcond(dir.path(), &["--no-json", "types"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_of(&output).contains("failed to load config"));
}

#[test]
fn test_config_log_level_applies() {
    let dir = test_dir();
    write_config(
        dir.path(),
        &serde_json::json!({"settings": {"log_level": "debug"}}),
    );
    let file = write_template_file(dir.path());

    let output = run_scriptcond(dir.path(), &["--no-json", "dump", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stderr_of(&output).contains("parsed script"));

    // the environment overrides the config
    let output = run_scriptcond_with_env(
        dir.path(),
        &["--no-json", "dump", file.to_str().unwrap()],
        &[("SCRIPTCOND_LOG", "error")],
    );
    assert!(output.status.success());
    assert!(!stderr_of(&output).contains("parsed script"));
}
