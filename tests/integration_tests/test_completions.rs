// integration tests for shell completion output

use crate::common::*;

#[test]
fn test_completions_bash() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["completions", "bash"]);
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.contains("_scriptcond"), "bash completion: {}", stdout);
    assert!(stdout.contains("qualify"));
}

#[test]
fn test_completions_zsh() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["completions", "zsh"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("#compdef scriptcond"));
}

#[test]
fn test_completions_unknown_shell() {
    let dir = test_dir();

    let output = run_scriptcond(dir.path(), &["completions", "tcsh"]);
    assert!(!output.status.success());
}
