//! The ordering hook's permutation contract, exercised through a real
//! planner rather than the validator in isolation.
//!
//! Proves:
//! - Without a hook, registration order (cheapest recipe first) decides.
//! - A hook can steer the search to a different, still-valid plan.
//! - A hook that drops, duplicates, or substitutes candidates turns the
//!   run into a configuration error, not a silent misplan.

use scenario_tests::count_ops;
use stratagem_harness::adapter::build_domain;
use stratagem_harness::fixtures;
use stratagem_planner::{OrderingHookV1, PlanError, PlannerV1, TerminationV1};

fn rival_planner() -> (PlannerV1, stratagem_harness::adapter::DomainV1) {
    let rules = fixtures::rival_recipes_rules();
    let domain = build_domain(&rules, "agent");
    let planner = PlannerV1::new(
        domain.methods.clone(),
        domain.operators.clone(),
        domain.policy.clone(),
    )
    .unwrap();
    (planner, domain)
}

#[test]
fn registration_order_decides_without_a_hook() {
    let (planner, domain) = rival_planner();
    let result = planner
        .plan(&domain.initial_state, domain.goals.clone())
        .unwrap();

    assert_eq!(result.termination, TerminationV1::GoalReached);
    let plan = result.plan.unwrap();
    assert_eq!(count_ops(&plan, "op_quick_quarry"), 1);
    assert_eq!(count_ops(&plan, "op_slow_quarry"), 0);
}

#[test]
fn reversing_hook_steers_to_the_other_recipe() {
    let (mut planner, domain) = rival_planner();
    planner.set_ordering(OrderingHookV1::new("reverse", |_, candidates| {
        candidates.into_iter().rev().collect()
    }));
    let result = planner
        .plan(&domain.initial_state, domain.goals.clone())
        .unwrap();

    assert_eq!(result.termination, TerminationV1::GoalReached);
    let plan = result.plan.unwrap();
    assert!(count_ops(&plan, "op_slow_quarry") >= 1);
    assert_eq!(count_ops(&plan, "op_quick_quarry"), 0);
}

#[test]
fn hook_dropping_a_candidate_is_a_config_error() {
    let (mut planner, domain) = rival_planner();
    planner.set_ordering(OrderingHookV1::new("dropper", |_, mut candidates| {
        if candidates.len() > 1 {
            candidates.pop();
        }
        candidates
    }));
    let err = planner
        .plan(&domain.initial_state, domain.goals.clone())
        .unwrap_err();
    assert!(matches!(err, PlanError::OrderingContractViolation { .. }));
}

#[test]
fn hook_duplicating_a_candidate_is_a_config_error() {
    let (mut planner, domain) = rival_planner();
    planner.set_ordering(OrderingHookV1::new("duplicator", |_, mut candidates| {
        if let Some(first) = candidates.first().cloned() {
            candidates.push(first);
        }
        candidates
    }));
    let err = planner
        .plan(&domain.initial_state, domain.goals.clone())
        .unwrap_err();
    assert!(matches!(err, PlanError::OrderingContractViolation { .. }));
}

#[test]
fn violation_error_names_the_hook() {
    let (mut planner, domain) = rival_planner();
    planner.set_ordering(OrderingHookV1::new("bad_hook", |_, _| Vec::new()));
    let err = planner
        .plan(&domain.initial_state, domain.goals.clone())
        .unwrap_err();
    assert!(err.to_string().contains("bad_hook"), "got: {err}");
}
