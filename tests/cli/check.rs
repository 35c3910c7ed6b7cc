//! Tests for `pipegen check`.

use crate::support::*;

#[test]
fn test_check_builtin() {
    let t = Test::new();

    let output = t.check("dev");
    assert_success(&output);
    assert_stderr_contains(&output, "dev: 3 stacks");
    assert_stderr_contains(&output, "2 environments disjoint");
}

#[test]
fn test_check_single_environment_warns() {
    let t = Test::with_registry(REGISTRY_SINGLE);

    let output = t.check("staging");
    assert_success(&output);
    assert_stderr_contains(&output, "skipping disjointness check");
}

#[test]
fn test_check_detects_overlap_between_environments() {
    let t = Test::with_registry(REGISTRY_OVERLAP);

    let output = t.check("b");
    assert_failure(&output);
    assert_stderr_contains(&output, "name collision");
    assert_stderr_contains(&output, "p-r-stage-a-stage-b-");
}
