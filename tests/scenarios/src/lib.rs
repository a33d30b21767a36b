//! Shared helpers for the scenario test suite.

#![forbid(unsafe_code)]

use stratagem_harness::adapter::{build_domain, VAR_TIME};
use stratagem_harness::rules::RuleSetV1;
use stratagem_harness::runner::{run, PlanReportV1};
use stratagem_kernel::registry::OperatorOutcomeV1;
use stratagem_kernel::state::StateV1;
use stratagem_kernel::task::TaskV1;

/// Run a rule set for the default test entity.
///
/// # Panics
///
/// Panics when the run reports a configuration or replay error; scenario
/// worlds are expected to be well-formed.
#[must_use]
pub fn run_scenario(rules: &RuleSetV1) -> PlanReportV1 {
    run(rules, "agent").expect("scenario rule set must run cleanly")
}

/// Replay a plan against a fresh compile of `rules` and return the end
/// state.
///
/// # Panics
///
/// Panics when any step's operator is missing or refuses to apply.
#[must_use]
pub fn replay_plan(rules: &RuleSetV1, plan: &[TaskV1]) -> StateV1 {
    let domain = build_domain(rules, "agent");
    let mut state = domain.initial_state.clone();
    for task in plan {
        let op = domain
            .operators
            .get(&task.name)
            .unwrap_or_else(|| panic!("no operator for {}", task.key()));
        match op.apply(&state, &task.args) {
            OperatorOutcomeV1::Applied(next) => state = next,
            OperatorOutcomeV1::Inapplicable { detail } => {
                panic!("{} refused during replay: {detail}", task.key())
            }
        }
    }
    state
}

/// Assert no state variable went negative, time budget included.
///
/// # Panics
///
/// Panics on the first negative quantity.
pub fn assert_non_negative(state: &StateV1) {
    for (var, entity, qty) in state.iter() {
        assert!(qty >= 0, "negative quantity: {var}[{entity}] = {qty}");
    }
    assert!(state.quantity(VAR_TIME, "agent") >= 0, "time overdrawn");
}

/// Count plan steps whose primitive task is `op_name`.
#[must_use]
pub fn count_ops(plan: &[TaskV1], op_name: &str) -> usize {
    plan.iter().filter(|t| t.name == op_name).count()
}
