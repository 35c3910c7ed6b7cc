//! Tests for `pipegen synth`.

use crate::support::*;
use predicates::prelude::*;
use sha2::{Digest, Sha256};

#[test]
fn test_synth_default_set_to_stdout() {
    let t = Test::new();

    let output = t.synth("dev", &[]);
    assert_success(&output);

    let doc = stdout_json(&output);
    let stacks: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
    assert_eq!(stacks, DEV_STACKS);
    assert_eq!(
        doc[DEV_STACKS[1]]["Resources"]["InfraPipeline"]["Properties"]["Name"],
        "hrmgo-us-east-2-codepipeline-dev-infra-pipeline"
    );
}

#[test]
fn test_synth_single_variant() {
    let t = Test::new();

    let output = t.synth("prod", &["cicd"]);
    assert_success(&output);

    let doc = stdout_json(&output);
    let stacks = doc.as_object().unwrap();
    assert_eq!(stacks.len(), 1);
    let template = &stacks["hrmgo-us-east-2-stack-prod-cicd-pipeline"];
    assert_eq!(template["Metadata"]["Account"], "364964202465");
    assert_eq!(
        template["Parameters"]["ConnectionArn"]["Default"],
        "hrmgo-us-east-2-ps-prod-cicd-conn-arn"
    );
}

#[test]
fn test_synth_yaml() {
    let t = Test::new();

    t.cmd()
        .args(["--env", "dev", "synth", "infra", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "hrmgo-us-east-2-stack-dev-infra-pipeline:",
        ))
        .stdout(predicate::str::contains("AWS::CodePipeline::Pipeline"));
}

#[test]
fn test_synth_writes_directory_and_manifest() {
    let t = Test::new();

    let output = t.synth("dev", &["--out", "cdk.out"]);
    assert_success(&output);
    assert_stderr_contains(&output, "3 stacks for dev written to");

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(t.path("cdk.out/manifest.json")).unwrap()).unwrap();
    let entries = manifest["stacks"].as_array().unwrap();
    assert_eq!(entries.len(), 3);

    for (entry, stack) in entries.iter().zip(DEV_STACKS) {
        assert_eq!(entry["stack"], stack);
        let file = entry["file"].as_str().unwrap();
        assert_eq!(file, format!("{}.template.json", stack));

        let contents = std::fs::read(t.path("cdk.out").join(file)).unwrap();
        assert_eq!(
            entry["sha256"].as_str().unwrap(),
            format!("{:x}", Sha256::digest(&contents))
        );
    }
}

#[test]
fn test_synth_is_deterministic() {
    let t = Test::new();

    let first = t.synth("dev", &[]);
    let second = t.synth("dev", &[]);
    assert_success(&first);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_synth_both_app_variants_collide() {
    let t = Test::new();

    let output = t.synth("dev", &["app", "app-single"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "name collision");
    assert_stderr_contains(&output, "hrmgo-us-east-2-stack-dev-app-pipeline");
}

#[test]
fn test_synth_unknown_variant_rejected() {
    let t = Test::new();

    t.cmd()
        .args(["--env", "dev", "synth", "web"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown pipeline variant 'web'"));
}

#[test]
fn test_synth_custom_registry_environment() {
    let t = Test::with_registry(REGISTRY_QA);

    let output = t.synth("qa", &["app-single"]);
    assert_success(&output);
    let doc = stdout_json(&output);
    let template = &doc["hrmgo-us-west-2-stack-qa-app-pipeline"];
    assert_eq!(
        template["Resources"]["ArtifactsBucket"]["Properties"]["BucketName"],
        "hrmgo-us-west-2-s3-qa-app-pipeline-artifacts"
    );
}
