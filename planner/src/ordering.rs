//! Ordering hook: per-call re-ranking of candidate methods.
//!
//! The hook sees the same context as a heuristic check plus the
//! candidate list, and returns a permutation of that list. It may not
//! add, drop, or duplicate candidates — the engine validates the output
//! against the input by method-name multiset and treats a mismatch as a
//! configuration error. Ordering changes which plan is found first and
//! how much work the search does, never whether a solution exists.

use std::sync::Arc;

use stratagem_kernel::registry::MethodV1;

use crate::error::PlanError;
use crate::heuristic::ExpansionContextV1;

/// Hook signature: context + candidates in, permuted candidates out.
pub type OrderingFn =
    Arc<dyn Fn(&ExpansionContextV1<'_>, Vec<MethodV1>) -> Vec<MethodV1> + Send + Sync>;

/// A named ordering hook. At most one is active per planner instance;
/// installing a second replaces the first (registry semantics).
#[derive(Clone)]
pub struct OrderingHookV1 {
    /// Diagnostic name, e.g. `deficiency_ordering`.
    pub name: String,
    rank: OrderingFn,
}

impl OrderingHookV1 {
    /// Wrap a ranking function with its diagnostic name.
    pub fn new(
        name: impl Into<String>,
        rank: impl Fn(&ExpansionContextV1<'_>, Vec<MethodV1>) -> Vec<MethodV1>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            rank: Arc::new(rank),
        }
    }

    /// Re-rank the candidates for one expansion.
    #[must_use]
    pub fn rank(&self, ctx: &ExpansionContextV1<'_>, candidates: Vec<MethodV1>) -> Vec<MethodV1> {
        (self.rank)(ctx, candidates)
    }
}

impl std::fmt::Debug for OrderingHookV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderingHookV1")
            .field("name", &self.name)
            .finish()
    }
}

/// Validate that `output` is a permutation of `input`.
///
/// Candidates are compared by method-name multiset. Method names within
/// one candidate list are expected to be distinct (the adapter derives
/// them from recipe names), so name equality is identity equality here.
///
/// # Errors
///
/// Returns [`PlanError::OrderingContractViolation`] when the multisets
/// differ.
pub fn validate_permutation(
    hook_name: &str,
    input: &[MethodV1],
    output: &[MethodV1],
) -> Result<(), PlanError> {
    if input.len() != output.len() {
        return Err(PlanError::OrderingContractViolation {
            hook: hook_name.to_string(),
            detail: format!(
                "candidate count changed: {} in, {} out",
                input.len(),
                output.len()
            ),
        });
    }

    let mut in_names: Vec<&str> = input.iter().map(|m| m.name.as_str()).collect();
    let mut out_names: Vec<&str> = output.iter().map(|m| m.name.as_str()).collect();
    in_names.sort_unstable();
    out_names.sort_unstable();

    if in_names != out_names {
        return Err(PlanError::OrderingContractViolation {
            hook: hook_name.to_string(),
            detail: format!("candidate sets differ: {in_names:?} vs {out_names:?}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratagem_kernel::registry::MethodOutcomeV1;

    fn method(name: &str) -> MethodV1 {
        MethodV1::new(name, |_, _| MethodOutcomeV1::Infeasible)
    }

    #[test]
    fn identity_and_reversal_are_permutations() {
        let input = vec![method("a"), method("b"), method("c")];
        assert!(validate_permutation("test", &input, &input).is_ok());

        let reversed: Vec<MethodV1> = input.iter().rev().cloned().collect();
        assert!(validate_permutation("test", &input, &reversed).is_ok());
    }

    #[test]
    fn dropped_candidate_rejected() {
        let input = vec![method("a"), method("b")];
        let output = vec![method("a")];
        let err = validate_permutation("test", &input, &output).unwrap_err();
        assert!(matches!(err, PlanError::OrderingContractViolation { .. }));
    }

    #[test]
    fn duplicated_candidate_rejected() {
        let input = vec![method("a"), method("b")];
        let output = vec![method("a"), method("a")];
        let err = validate_permutation("test", &input, &output).unwrap_err();
        assert!(matches!(err, PlanError::OrderingContractViolation { .. }));
    }

    #[test]
    fn substituted_candidate_rejected() {
        let input = vec![method("a"), method("b")];
        let output = vec![method("a"), method("z")];
        let err = validate_permutation("test", &input, &output).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("candidate sets differ"), "got: {msg}");
    }
}
