//! End-to-end runner: rules in, audited plan report out.
//!
//! Wires the adapter output into a planner, runs the search, and then
//! replays any found plan through the operators from the initial state.
//! The replay is an independent validity check: a plan the operators
//! refuse, or one whose final state disagrees with the engine's, is a
//! bug in this crate, and the runner reports it instead of the plan.

use std::path::Path;

use stratagem_kernel::canon::canonical_json_bytes;
use stratagem_kernel::hash::{canonical_hash, ContentHash, DOMAIN_PLAN};
use stratagem_kernel::registry::OperatorOutcomeV1;
use stratagem_kernel::state::StateV1;
use stratagem_kernel::task::{entity_item_qty, TaskV1};
use stratagem_planner::{PlanError, PlanStatsV1, PlanTraceV1, PlannerV1, TerminationV1};

use crate::adapter::{build_domain, DomainV1, TASK_HAVE_ENOUGH, VAR_TIME};
use crate::heuristics::domain_checks;
use crate::ordering::deficiency_ordering;
use crate::rules::{RuleFileError, RuleSetV1};

/// Failures surfaced by a full run.
#[derive(Debug)]
pub enum RunError {
    /// The rule file failed to load or validate.
    Rules(RuleFileError),
    /// The planner rejected its configuration.
    Plan(PlanError),
    /// A found plan failed independent replay.
    ReplayDivergence {
        /// What diverged and where.
        detail: String,
    },
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rules(e) => write!(f, "rule file error: {e}"),
            Self::Plan(e) => write!(f, "planner error: {e}"),
            Self::ReplayDivergence { detail } => {
                write!(f, "plan failed replay validation: {detail}")
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rules(e) => Some(e),
            Self::Plan(e) => Some(e),
            Self::ReplayDivergence { .. } => None,
        }
    }
}

impl From<RuleFileError> for RunError {
    fn from(e: RuleFileError) -> Self {
        Self::Rules(e)
    }
}

impl From<PlanError> for RunError {
    fn from(e: PlanError) -> Self {
        Self::Plan(e)
    }
}

/// Outcome of one run, with enough digests to compare runs byte-for-byte.
#[derive(Debug)]
pub struct PlanReportV1 {
    /// Why the search stopped.
    pub termination: TerminationV1,
    /// The replay-validated plan, when one was found.
    pub plan: Option<Vec<TaskV1>>,
    /// State after the last plan step, when a plan was found.
    pub final_state: Option<StateV1>,
    /// Search counters.
    pub stats: PlanStatsV1,
    /// Search audit trail.
    pub trace: PlanTraceV1,
    /// Digest of the validated rule set.
    pub rule_digest: ContentHash,
    /// Digest of the compiled method registry surface.
    pub method_registry_digest: ContentHash,
    /// Digest of the compiled operator registry surface.
    pub operator_registry_digest: ContentHash,
    /// Digest of the plan's task keys, when a plan was found.
    pub plan_digest: Option<ContentHash>,
}

/// Domain-separated digest of a plan's canonical task keys.
///
/// # Panics
///
/// Never panics: the serialized value holds only strings.
#[must_use]
pub fn plan_digest(plan: &[TaskV1]) -> ContentHash {
    let keys: Vec<String> = plan.iter().map(TaskV1::key).collect();
    let value = serde_json::json!(keys);
    let bytes = canonical_json_bytes(&value).expect("task keys are strings");
    canonical_hash(DOMAIN_PLAN, &bytes)
}

/// Build the planner for a compiled domain: adapter registries plus the
/// catalog's heuristic checks and the deficiency ordering hook.
///
/// # Errors
///
/// Returns [`PlanError::InvalidPolicy`] if the domain's policy fails
/// validation.
pub fn build_planner(rules: &RuleSetV1, domain: &DomainV1) -> Result<PlannerV1, PlanError> {
    let mut planner = PlannerV1::new(
        domain.methods.clone(),
        domain.operators.clone(),
        domain.policy.clone(),
    )?;
    for check in domain_checks(rules) {
        planner.add_check(check);
    }
    planner.set_ordering(deficiency_ordering(domain.recipe_index.clone()));
    Ok(planner)
}

/// Plan for `rules` and replay-validate the result.
///
/// # Errors
///
/// Returns [`RunError::Plan`] for configuration defects and
/// [`RunError::ReplayDivergence`] when a found plan does not survive
/// independent replay. Exhaustion is an `Ok` report.
pub fn run(rules: &RuleSetV1, entity: &str) -> Result<PlanReportV1, RunError> {
    let domain = build_domain(rules, entity);
    let planner = build_planner(rules, &domain)?;
    let result = planner.plan(&domain.initial_state, domain.goals.clone())?;

    let digest = result.plan.as_deref().map(plan_digest);
    if let (Some(plan), Some(final_state)) = (&result.plan, &result.final_state) {
        let replayed = replay(&domain, plan, entity)?;
        if replayed != *final_state {
            return Err(RunError::ReplayDivergence {
                detail: format!(
                    "replayed state {} != engine state {}",
                    replayed.fingerprint(),
                    final_state.fingerprint()
                ),
            });
        }
    }

    Ok(PlanReportV1 {
        termination: result.termination,
        plan: result.plan,
        final_state: result.final_state,
        stats: result.stats,
        trace: result.trace,
        rule_digest: rules.digest(),
        method_registry_digest: domain.methods.digest(),
        operator_registry_digest: domain.operators.digest(),
        plan_digest: digest,
    })
}

/// Load a rule file and run it.
///
/// # Errors
///
/// Everything [`RuleSetV1::load`] and [`run`] report.
pub fn run_file(path: &Path, entity: &str) -> Result<PlanReportV1, RunError> {
    let rules = RuleSetV1::load(path)?;
    run(&rules, entity)
}

/// Replay `plan` through the operators and check the goal thresholds,
/// the time budget, and quantity non-negativity.
fn replay(domain: &DomainV1, plan: &[TaskV1], entity: &str) -> Result<StateV1, RunError> {
    let mut state = domain.initial_state.clone();
    for (step, task) in plan.iter().enumerate() {
        let Some(op) = domain.operators.get(&task.name) else {
            return Err(RunError::ReplayDivergence {
                detail: format!("step {step}: no operator for {}", task.key()),
            });
        };
        match op.apply(&state, &task.args) {
            OperatorOutcomeV1::Applied(next) => state = next,
            OperatorOutcomeV1::Inapplicable { detail } => {
                return Err(RunError::ReplayDivergence {
                    detail: format!("step {step}: {} refused: {detail}", task.key()),
                });
            }
        }
    }

    for goal in &domain.goals {
        if goal.name != TASK_HAVE_ENOUGH {
            continue;
        }
        let Some((who, item, qty)) = entity_item_qty(&goal.args) else {
            continue;
        };
        let held = state.quantity(item, who);
        if held < qty {
            return Err(RunError::ReplayDivergence {
                detail: format!("goal {item} unmet: have {held}, need {qty}"),
            });
        }
    }
    if state.quantity(VAR_TIME, entity) < 0 {
        return Err(RunError::ReplayDivergence {
            detail: "time budget overdrawn".into(),
        });
    }
    for (var, who, qty) in state.iter() {
        if qty < 0 {
            return Err(RunError::ReplayDivergence {
                detail: format!("negative quantity: {var}[{who}] = {qty}"),
            });
        }
    }
    Ok(state)
}
