//! Heuristic checks: pruning predicates consulted before expansion.
//!
//! A check sees the full expansion context and answers one question:
//! should this branch be abandoned before any method is attempted?
//! `true` means prune. Checks run in registration order and the first
//! prune wins. Checks must be pure — same context, same answer — so a
//! given search path stays deterministic.

use std::sync::Arc;

use stratagem_kernel::state::StateV1;
use stratagem_kernel::task::TaskV1;

/// Everything a check (or ordering hook) may inspect at a choice point.
///
/// `remaining_tasks` excludes `current_task`; `calling_stack` holds the
/// canonical keys of the ancestor tasks still being decomposed, root
/// first.
#[derive(Debug)]
pub struct ExpansionContextV1<'a> {
    /// The state at this node.
    pub state: &'a StateV1,
    /// The compound task about to be expanded.
    pub current_task: &'a TaskV1,
    /// Goal tasks still queued after the current one.
    pub remaining_tasks: &'a [TaskV1],
    /// Primitive tasks applied so far on this path.
    pub plan: &'a [TaskV1],
    /// Recursion depth of this node.
    pub depth: u32,
    /// Canonical keys of ancestor tasks under decomposition.
    pub calling_stack: &'a [String],
}

/// Predicate signature for a pruning check.
pub type HeuristicFn = Arc<dyn Fn(&ExpansionContextV1<'_>) -> bool + Send + Sync>;

/// A named pruning predicate.
///
/// The name appears in trace events so a pruned branch can be attributed
/// to the check that cut it.
#[derive(Clone)]
pub struct HeuristicCheckV1 {
    /// Diagnostic name, e.g. `depth_bound` or `skip_iron_axe`.
    pub name: String,
    check: HeuristicFn,
}

impl HeuristicCheckV1 {
    /// Wrap a predicate with its diagnostic name.
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&ExpansionContextV1<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Evaluate the predicate. `true` means prune.
    #[must_use]
    pub fn should_prune(&self, ctx: &ExpansionContextV1<'_>) -> bool {
        (self.check)(ctx)
    }
}

impl std::fmt::Debug for HeuristicCheckV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicCheckV1")
            .field("name", &self.name)
            .finish()
    }
}

/// Built-in check: prune once recursion depth reaches `max_depth`.
#[must_use]
pub fn depth_bound(max_depth: u32) -> HeuristicCheckV1 {
    HeuristicCheckV1::new("depth_bound", move |ctx| ctx.depth >= max_depth)
}

/// Built-in check: prune when the current task's key already appears
/// `max_repeats` times in the calling stack. The stack holds only live
/// ancestors (frames with subtasks still pending), so this catches
/// recursion that keeps stacking demand for the same key, not the
/// ordinary produce-and-recheck cycle.
#[must_use]
pub fn repetition_bound(max_repeats: u32) -> HeuristicCheckV1 {
    HeuristicCheckV1::new("repetition_bound", move |ctx| {
        let key = ctx.current_task.key();
        let occurrences = ctx
            .calling_stack
            .iter()
            .filter(|entry| **entry == key)
            .count();
        occurrences >= max_repeats as usize
    })
}
