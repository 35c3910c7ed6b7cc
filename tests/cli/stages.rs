//! Tests for `pipegen stages`.

use crate::support::*;

fn stage_lines(out: &str) -> Vec<String> {
    out.lines()
        .filter_map(|l| l.trim_start().split_once(". "))
        .filter(|(n, _)| n.chars().all(|c| c.is_ascii_digit()))
        .map(|(_, name)| name.to_string())
        .collect()
}

#[test]
fn test_stages_infra_order() {
    let t = Test::new();

    let output = t.stages("dev", "infra");
    assert_success(&output);

    let prefix = "hrmgo-us-east-2-stage-dev-";
    let expected: Vec<String> = [
        "source",
        "linting",
        "synth",
        "unit-test",
        "security",
        "predeploy",
        "manual-approval",
        "deploy",
    ]
    .iter()
    .map(|s| format!("{}{}", prefix, s))
    .collect();
    assert_eq!(stage_lines(&stdout(&output)), expected);
}

#[test]
fn test_stages_app_single_gates() {
    let t = Test::new();

    let output = t.stages("prod", "app-single");
    assert_success(&output);
    let out = stdout(&output);
    assert_eq!(out.matches("Approval").count(), 2);
    assert!(out.contains("hrmgo-us-east-2-codepipeline-prod-app-pipeline"));
}

#[test]
fn test_stages_requires_variant() {
    let t = Test::new();

    let output = t.run("dev", &["stages"]);
    assert_failure(&output);
}
