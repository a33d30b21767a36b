//! Plan policy: search bounds and derive-once configuration.

use std::collections::BTreeSet;

use crate::error::PlanError;

/// Budget and cycle-control configuration for a planning run.
///
/// The depth and repetition bounds are enforced through built-in
/// heuristic checks installed ahead of any domain-supplied checks, so
/// exceeding either is an ordinary prune, never a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanPolicyV1 {
    /// Recursion-depth cutoff.
    pub max_depth: u32,
    /// How many times one task key may appear in the active calling
    /// stack before the branch is pruned.
    pub max_task_repeats: u32,
    /// Compound task names expanded at most once per `(name, args)` key
    /// along a single search path. Generalizes per-item "already made,
    /// do not re-derive" bookkeeping out of domain state.
    pub derive_once_tasks: BTreeSet<String>,
}

impl Default for PlanPolicyV1 {
    fn default() -> Self {
        Self {
            max_depth: 400,
            max_task_repeats: 5,
            derive_once_tasks: BTreeSet::new(),
        }
    }
}

impl PlanPolicyV1 {
    /// Validate the policy before a run.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidPolicy`] if either bound is zero — a
    /// zero bound would prune every branch at the root.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.max_depth == 0 {
            return Err(PlanError::InvalidPolicy {
                detail: "max_depth must be at least 1".into(),
            });
        }
        if self.max_task_repeats == 0 {
            return Err(PlanError::InvalidPolicy {
                detail: "max_task_repeats must be at least 1".into(),
            });
        }
        Ok(())
    }
}
