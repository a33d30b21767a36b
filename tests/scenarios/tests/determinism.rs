//! Repeated runs with identical inputs must be bit-for-bit identical:
//! same plan, same trace, same stats, same digests.

use scenario_tests::run_scenario;
use stratagem_harness::fixtures;
use stratagem_harness::rules::RuleSetV1;

#[test]
fn repeated_runs_agree_on_everything() {
    let rules = fixtures::crafting_catalog_rules();
    let a = run_scenario(&rules);
    let b = run_scenario(&rules);

    assert_eq!(a.termination, b.termination);
    assert_eq!(a.plan, b.plan);
    assert_eq!(a.final_state, b.final_state);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.trace, b.trace);
    assert_eq!(a.plan_digest, b.plan_digest);
}

#[test]
fn exhausted_runs_are_deterministic_too() {
    let rules = fixtures::stymied_rules();
    let a = run_scenario(&rules);
    let b = run_scenario(&rules);

    assert_eq!(a.termination, b.termination);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.trace, b.trace);
}

#[test]
fn rule_digest_ignores_key_order_and_whitespace() {
    let compact: serde_json::Value = serde_json::from_str(
        r#"{"Items":["wood"],"Tools":[],"Recipes":{"punch for wood":{"Produces":{"wood":1},"Time":4}},"Problem":{"Initial":{},"Goal":{"wood":2},"Time":100}}"#,
    )
    .unwrap();
    let shuffled: serde_json::Value = serde_json::from_str(
        r#"{
            "Problem": { "Time": 100, "Goal": { "wood": 2 }, "Initial": {} },
            "Recipes": { "punch for wood": { "Time": 4, "Produces": { "wood": 1 } } },
            "Tools": [],
            "Items": ["wood"]
        }"#,
    )
    .unwrap();

    let a = RuleSetV1::from_value(&compact).unwrap();
    let b = RuleSetV1::from_value(&shuffled).unwrap();
    assert_eq!(a.digest(), b.digest());
    assert_eq!(a.digest(), fixtures::punch_wood_rules().digest());
}

#[test]
fn registry_digests_are_stable_across_compiles() {
    let rules = fixtures::crafting_catalog_rules();
    let a = run_scenario(&rules);
    let b = run_scenario(&rules);
    assert_eq!(a.method_registry_digest, b.method_registry_digest);
    assert_eq!(a.operator_registry_digest, b.operator_registry_digest);
    assert_eq!(a.rule_digest, b.rule_digest);
}
