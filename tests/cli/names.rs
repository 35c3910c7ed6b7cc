//! Tests for `pipegen names`.

use crate::support::*;

#[test]
fn test_names_json() {
    let t = Test::new();

    let output = t.names_json("dev");
    assert_success(&output);

    let doc = stdout_json(&output);
    assert_eq!(doc["environment"], "dev");
    let names = doc["names"].as_array().unwrap();
    assert_eq!(doc["count"].as_u64().unwrap() as usize, names.len());

    let unit_test = names
        .iter()
        .find(|c| c["owner"] == "codebuild/app-unit-test")
        .expect("unit test project missing");
    assert_eq!(unit_test["name"], "hrmgo-us-east-2-codebuild-dev-app-unit-test");
}

#[test]
fn test_names_sorted() {
    let t = Test::new();

    let doc = stdout_json(&t.names_json("prod"));
    let names: Vec<_> = doc["names"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.iter().all(|n| n.starts_with("hrmgo-us-east-2-")));
}

#[test]
fn test_names_table() {
    let t = Test::new();

    let output = t.run("dev", &["names"]);
    assert_success(&output);
    assert_stdout_contains(&output, "names for dev");
    assert_stdout_contains(&output, "sm/env");
    assert_stdout_contains(&output, "hrmgo-us-east-2-sm-dev-env");
}
