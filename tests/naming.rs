//! Naming properties across the public API.

use pipegen::core::environment::{EnvironmentConfig, Registry};
use pipegen::core::naming::{NameLedger, Namer};
use pipegen::core::pipeline::Variant;
use pipegen::core::stack::Stack;
use pipegen::core::synth;
use pipegen::error::{Error, NamingError};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[test]
fn test_reference_name() {
    let namer = Namer::new(&EnvironmentConfig::dev());
    assert_eq!(
        namer.name("codebuild", "app-unit-test"),
        "hrmgo-us-east-2-codebuild-dev-app-unit-test"
    );
}

#[test]
fn test_every_generated_name_has_environment_prefix() {
    for (key, env) in Registry::builtin().iter() {
        let prefix = format!("{}-{}-", env.project, env.region);
        let segment = format!("-{}-", key);
        for variant in Variant::ALL {
            let stack = Stack::build(env, variant).unwrap();
            for claim in &stack.names {
                assert!(claim.name.starts_with(&prefix), "{}", claim.name);
                assert!(claim.name.contains(&segment), "{}", claim.name);
            }
        }
    }
}

#[test]
fn test_dev_and_prod_names_are_disjoint() {
    let dev: BTreeSet<String> = synth::names(&EnvironmentConfig::dev())
        .unwrap()
        .names()
        .map(String::from)
        .collect();
    let prod: BTreeSet<String> = synth::names(&EnvironmentConfig::prod())
        .unwrap()
        .names()
        .map(String::from)
        .collect();
    assert_eq!(dev.len(), prod.len());
    assert!(dev.is_disjoint(&prod));
}

#[test]
fn test_ledger_rejects_ambiguous_split() {
    let namer = Namer::new(&EnvironmentConfig::dev());
    let a = namer.name("stack", "a-dev-b");
    let b = namer.name("stack-dev-a", "b");
    assert_eq!(a, b);

    let mut ledger = NameLedger::new();
    ledger.claim("stack/a-dev-b", &a).unwrap();
    ledger.claim("stack/a-dev-b", &a).unwrap();
    let err = ledger.claim("stack-dev-a/b", &b).unwrap_err();
    assert!(matches!(err, Error::Naming(NamingError::Collision { .. })));
}

proptest! {
    #[test]
    fn prop_name_is_plain_concatenation(
        kind in "[a-z]{1,10}",
        functionality in "[a-z0-9-]{1,24}",
    ) {
        let env = EnvironmentConfig::prod();
        let name = Namer::new(&env).name(&kind, &functionality);
        prop_assert_eq!(
            name,
            format!("hrmgo-us-east-2-{}-prod-{}", kind, functionality)
        );
    }
}
