//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "pipegen");
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("deploy").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_invalid_flag_value_exits_one() {
    let t = Test::new();

    t.cmd()
        .args(["--env", "dev", "synth", "--format", "xml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pipegen "));
}

#[test]
fn test_missing_selector() {
    let t = Test::new();

    let output = t.cmd().arg("synth").output().unwrap();
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "✗ no environment selected");
    assert_stderr_contains(&output, "PIPEGEN_ENV");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_selector_from_environment_variable() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("PIPEGEN_ENV", "prod")
        .args(["stages", "cicd"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "hrmgo-us-east-2-stage-prod-source");
}

#[test]
fn test_unknown_environment() {
    let t = Test::new();

    let output = t.synth("qa", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "unknown environment 'qa' (known: dev, prod)");
    assert_stderr_contains(&output, "pipegen envs");
}

#[test]
fn test_missing_registry_file() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["--registry", "nope.toml", "envs"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to read registry");
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "pipegen");
}
