//! End-to-end scenario runs through the full stack: rule file →
//! adapter → planner → replay-validated report.
//!
//! Proves:
//! - A reachable goal yields a plan whose replay satisfies the goal.
//! - An unreachable goal terminates as `Exhausted` with an audit trail.
//! - A goal quantity above the repeat bound still resolves.
//! - Rival recipes resolve to the cheaper one under the default setup.
//! - A self-consuming recipe loop is cut by the repetition bound.
//! - Tool production happens at most once on a successful path.

use scenario_tests::{assert_non_negative, count_ops, replay_plan, run_scenario};
use stratagem_harness::adapter::VAR_TIME;
use stratagem_harness::fixtures;
use stratagem_harness::rules::RuleSetV1;
use stratagem_planner::TerminationV1;

// ---------------------------------------------------------------------------
// Reachable goals
// ---------------------------------------------------------------------------

#[test]
fn simple_gathering_goal_is_planned_and_replayable() {
    let rules = fixtures::punch_wood_rules();
    let report = run_scenario(&rules);

    assert_eq!(report.termination, TerminationV1::GoalReached);
    let plan = report.plan.as_ref().expect("plan expected");
    assert_eq!(count_ops(plan, "op_punch_for_wood"), 2);

    let end = replay_plan(&rules, plan);
    assert_eq!(end.quantity("wood", "agent"), 2);
    assert_eq!(end.quantity(VAR_TIME, "agent"), 92);
    assert_non_negative(&end);
}

#[test]
fn bulk_gathering_goal_is_planned_and_replayable() {
    // Eight gather cycles re-expand the same goal key, well past the
    // default repeat bound of five; only live recursion may count.
    let mut rules = fixtures::punch_wood_rules();
    rules.problem.goal = [("wood".to_string(), 8)].into_iter().collect();

    let report = run_scenario(&rules);
    assert_eq!(report.termination, TerminationV1::GoalReached);
    let plan = report.plan.as_ref().expect("plan expected");
    assert_eq!(count_ops(plan, "op_punch_for_wood"), 8);

    let end = replay_plan(&rules, plan);
    assert_eq!(end.quantity("wood", "agent"), 8);
    assert_eq!(end.quantity(VAR_TIME, "agent"), 68);
    assert_non_negative(&end);
}

#[test]
fn rival_recipes_prefer_the_cheaper_time_cost() {
    let report = run_scenario(&fixtures::rival_recipes_rules());

    assert_eq!(report.termination, TerminationV1::GoalReached);
    let plan = report.plan.as_ref().expect("plan expected");
    assert_eq!(plan.len(), 1);
    assert_eq!(count_ops(plan, "op_quick_quarry"), 1);
    assert_eq!(count_ops(plan, "op_slow_quarry"), 0);
}

#[test]
fn tool_chain_goal_builds_each_tool_once() {
    let mut rules = fixtures::crafting_catalog_rules();
    rules.problem.goal = [("stone_pickaxe".to_string(), 1)].into_iter().collect();

    let report = run_scenario(&rules);
    assert_eq!(report.termination, TerminationV1::GoalReached);
    let plan = report.plan.as_ref().expect("plan expected");

    // The wooden pickaxe is an intermediate tool; it must be crafted
    // exactly once even though three cobble gathers each demand it.
    assert_eq!(count_ops(plan, "op_craft_wooden_pickaxe"), 1);
    assert_eq!(count_ops(plan, "op_craft_stone_pickaxe"), 1);

    let end = replay_plan(&rules, plan);
    assert!(end.quantity("stone_pickaxe", "agent") >= 1);
    assert_non_negative(&end);
}

#[test]
fn axe_detours_are_pruned_when_punching_suffices() {
    let rules = fixtures::crafting_catalog_rules();
    let report = run_scenario(&rules);

    assert_eq!(report.termination, TerminationV1::GoalReached);
    let plan = report.plan.as_ref().expect("plan expected");
    assert_eq!(count_ops(plan, "op_punch_for_wood"), 3);
    assert_eq!(count_ops(plan, "op_craft_wooden_axe"), 0);
    assert_eq!(count_ops(plan, "op_craft_stone_axe"), 0);
    assert_eq!(count_ops(plan, "op_craft_iron_axe"), 0);
}

// ---------------------------------------------------------------------------
// Unreachable goals
// ---------------------------------------------------------------------------

#[test]
fn starved_inputs_exhaust_instead_of_erroring() {
    let report = run_scenario(&fixtures::stymied_rules());

    assert_eq!(report.termination, TerminationV1::Exhausted);
    assert!(report.plan.is_none());
    assert!(report.final_state.is_none());
    assert!(report.plan_digest.is_none());
    // Exhaustion must still leave a diagnosable trail.
    assert!(!report.trace.events.is_empty());
    assert!(report.stats.expansions > 0);
}

#[test]
fn self_consuming_recipe_loop_is_cut_by_repetition_bound() {
    let report = run_scenario(&fixtures::ouroboros_rules());

    assert_eq!(report.termination, TerminationV1::Exhausted);
    assert!(report.plan.is_none());
    assert!(report.stats.branches_pruned > 0);
}

#[test]
fn insufficient_time_budget_exhausts() {
    let rules = RuleSetV1::from_value(&serde_json::json!({
        "Items": ["wood"],
        "Tools": [],
        "Recipes": {
            "punch for wood": { "Produces": { "wood": 1 }, "Time": 4 }
        },
        "Problem": {
            "Initial": {},
            "Goal": { "wood": 3 },
            "Time": 10
        }
    }))
    .unwrap();

    // Two punches fit the budget, three do not.
    let report = run_scenario(&rules);
    assert_eq!(report.termination, TerminationV1::Exhausted);
    assert!(report.plan.is_none());
    assert!(report.stats.operator_rejections > 0);
}
