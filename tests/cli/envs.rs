//! Tests for `pipegen envs`.

use crate::support::*;

#[test]
fn test_envs_builtin() {
    let t = Test::new();

    let output = t.envs(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "884162918988");
    assert_stdout_contains(&output, "364964202465");
}

#[test]
fn test_envs_json_from_local_registry() {
    let t = Test::with_registry(REGISTRY_QA);

    let output = t.envs(&["--json"]);
    assert_success(&output);
    let doc = stdout_json(&output);
    let keys: Vec<_> = doc["environments"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["dev", "qa"]);
    assert_eq!(doc["environments"]["qa"]["app"]["branch"], "qa");
}

#[test]
fn test_envs_explicit_registry_path() {
    let t = Test::new();
    t.write("other.toml", REGISTRY_SINGLE);

    let output = t
        .cmd()
        .args(["--registry", "other.toml", "envs"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "staging");
    assert_stdout_excludes(&output, "884162918988");
}

#[test]
fn test_envs_legacy_shape_rejected() {
    let t = Test::with_registry(REGISTRY_LEGACY);

    let output = t.envs(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse registry");
}

#[test]
fn test_envs_bad_account_rejected() {
    let t = Test::with_registry(REGISTRY_BAD_ACCOUNT);

    let output = t.envs(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid account_id");
}
