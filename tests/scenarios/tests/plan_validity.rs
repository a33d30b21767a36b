//! Plan validity and rule-file handling at the outermost surface.
//!
//! Proves:
//! - An already-satisfied goal yields an empty plan, not busywork.
//! - Replaying a found plan keeps every quantity non-negative and meets
//!   every goal threshold.
//! - Rule files round-trip through disk with identical digests.
//! - Malformed rule files surface as rule errors, not panics or plans.

use std::io::Write;

use scenario_tests::{assert_non_negative, replay_plan, run_scenario};
use stratagem_harness::fixtures;
use stratagem_harness::rules::{RuleFileError, RuleSetV1};
use stratagem_harness::runner::{run_file, RunError};
use stratagem_planner::TerminationV1;

#[test]
fn satisfied_goal_needs_no_steps() {
    let rules = RuleSetV1::from_value(&serde_json::json!({
        "Items": ["wood"],
        "Tools": [],
        "Recipes": {
            "punch for wood": { "Produces": { "wood": 1 }, "Time": 4 }
        },
        "Problem": {
            "Initial": { "wood": 5 },
            "Goal": { "wood": 2 },
            "Time": 100
        }
    }))
    .unwrap();

    let report = run_scenario(&rules);
    assert_eq!(report.termination, TerminationV1::GoalReached);
    assert_eq!(report.plan.as_ref().map(Vec::len), Some(0));
    let final_state = report.final_state.unwrap();
    assert_eq!(final_state.quantity("wood", "agent"), 5);
    assert_eq!(final_state.quantity("time", "agent"), 100);
}

#[test]
fn replayed_plans_meet_goals_without_going_negative() {
    let rules = fixtures::crafting_catalog_rules();
    let report = run_scenario(&rules);
    let plan = report.plan.as_ref().expect("plan expected");

    let end = replay_plan(&rules, plan);
    assert_non_negative(&end);
    for (item, qty) in &rules.problem.goal {
        assert!(end.quantity(item, "agent") >= *qty, "goal {item} unmet");
    }
}

#[test]
fn rule_files_round_trip_through_disk() {
    let rules = fixtures::punch_wood_rules();
    let text = serde_json::to_string_pretty(&serde_json::json!({
        "Items": ["wood"],
        "Tools": [],
        "Recipes": {
            "punch for wood": { "Produces": { "wood": 1 }, "Time": 4 }
        },
        "Problem": {
            "Initial": {},
            "Goal": { "wood": 2 },
            "Time": 100
        }
    }))
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crafting.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(text.as_bytes()).unwrap();

    let report = run_file(&path, "agent").unwrap();
    assert_eq!(report.rule_digest, rules.digest());
    assert_eq!(report.termination, TerminationV1::GoalReached);
}

#[test]
fn missing_rule_file_is_a_rule_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_file(&dir.path().join("absent.json"), "agent").unwrap_err();
    assert!(matches!(err, RunError::Rules(RuleFileError::Io { .. })));
}

#[test]
fn invalid_json_is_a_rule_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, b"{not json").unwrap();
    let err = run_file(&path, "agent").unwrap_err();
    assert!(matches!(err, RunError::Rules(RuleFileError::Json { .. })));
}

#[test]
fn negative_quantity_is_rejected_at_load() {
    let value = serde_json::json!({
        "Items": ["wood"],
        "Tools": [],
        "Recipes": {
            "punch for wood": { "Produces": { "wood": -1 }, "Time": 4 }
        },
        "Problem": { "Initial": {}, "Goal": { "wood": 1 }, "Time": 10 }
    });
    let err = RuleSetV1::from_value(&value).unwrap_err();
    assert!(matches!(err, RuleFileError::InvalidQuantity { .. }));
}

#[test]
fn undeclared_goal_name_is_rejected_at_load() {
    let value = serde_json::json!({
        "Items": ["wood"],
        "Tools": [],
        "Recipes": {
            "punch for wood": { "Produces": { "wood": 1 }, "Time": 4 }
        },
        "Problem": { "Initial": {}, "Goal": { "gold": 1 }, "Time": 10 }
    });
    let err = RuleSetV1::from_value(&value).unwrap_err();
    assert!(matches!(err, RuleFileError::UndeclaredName { .. }));
}
