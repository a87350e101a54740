// integration tests for the qualify command

use crate::common::*;
use std::fs;

fn qualify_args<'a>(file: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "qualify",
        file,
        "--qualifier",
        "_2",
        "--template-player",
        "SkirmishTemplate",
        "--player",
        "Player_3",
    ];
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_qualify_text_output() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let mut args = vec!["--no-json"];
    args.extend(qualify_args(file.to_str().unwrap(), &[]));
    let output = run_scriptcond(dir.path(), &args);
    let stdout = stdout_of(&output);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout.contains("Attack_2 [active, one-shot]"), "stdout: {}", stdout);
    assert!(stdout.contains("TEAM_HAS_UNITS(\"Raiders_2\")"));
    assert!(stdout.contains("PLAYER_ALL_DESTROYED(\"Player_3\")"));
    assert!(stdout.contains("COUNTER(\"waves_2\", >=, 2)"));
    assert!(stdout.contains("Retreat_2 [active]"));
    // the running team is never suffixed
    assert!(stdout.contains("TEAM_DESTROYED(\"<This Team>\")"));
}

#[test]
fn test_qualify_json_output() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let mut args = vec!["--json"];
    args.extend(qualify_args(file.to_str().unwrap(), &[]));
    let output = run_scriptcond(dir.path(), &args);
    assert!(output.status.success());

    let json = json_of(&output);
    assert_eq!(json["result"]["action"], "qualify");
    assert_eq!(json["result"]["qualifier"], "_2");
    assert!(json["result"].get("output").is_none());
    assert_eq!(json["result"]["scripts"][0]["name"], "Attack_2");
}

#[test]
fn test_qualify_writes_output_file() {
    let dir = test_dir();
    let file = write_template_file(dir.path());
    let original = fs::read(&file).unwrap();
    let out_path = dir.path().join("instance.scb");

    let mut args = vec!["--no-json"];
    args.extend(qualify_args(
        file.to_str().unwrap(),
        &["-o", out_path.to_str().unwrap()],
    ));
    let output = run_scriptcond(dir.path(), &args);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Wrote 2 script(s)"));
    // source untouched
    assert_eq!(fs::read(&file).unwrap(), original);

    let output = run_scriptcond(
        dir.path(),
        &["--no-json", "dump", out_path.to_str().unwrap()],
    );
    let stdout = stdout_of(&output);
    assert!(output.status.success());
    assert!(stdout.contains("Attack_2"));
    assert!(stdout.contains("TEAM_HAS_UNITS(\"Raiders_2\")"));
}

#[test]
fn test_qualify_suffix_only() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let output = run_scriptcond(
        dir.path(),
        &[
            "--no-json",
            "qualify",
            file.to_str().unwrap(),
            "--qualifier",
            "_x",
        ],
    );
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.contains("TEAM_HAS_UNITS(\"Raiders_x\")"));
    // side left alone without a template player
    assert!(stdout.contains("PLAYER_ALL_DESTROYED(\"SkirmishTemplate\")"));
}

#[test]
fn test_qualify_requires_something_to_do() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let output = run_scriptcond(
        dir.path(),
        &["--no-json", "qualify", file.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).contains("nothing to qualify"));
}

#[test]
fn test_qualify_template_player_needs_player() {
    let dir = test_dir();
    let file = write_template_file(dir.path());

    let output = run_scriptcond(
        dir.path(),
        &[
            "--json",
            "qualify",
            file.to_str().unwrap(),
            "--template-player",
            "SkirmishTemplate",
        ],
    );
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(json_of(&output)["error"]["code"], -32004);
}

#[test]
fn test_qualify_rejects_names_chunk_files_cannot_hold() {
    let dir = test_dir();
    let file = write_template_file(dir.path());
    let out = dir.path().join("out.bin");

    let output = run_scriptcond(
        dir.path(),
        &[
            "--no-json",
            "qualify",
            file.to_str().unwrap(),
            "--qualifier",
            "_\u{65e5}\u{672c}",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).contains("--qualifier must use latin-1 characters only"));
    assert!(!out.exists());
}
