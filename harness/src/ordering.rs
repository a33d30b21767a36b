//! Deficiency ordering: try the recipe that is closest to applicable.
//!
//! Registration order already puts cheaper recipes first; this hook
//! refines that per call by ranking candidates on how much of their
//! input is still missing from the current state. A recipe whose inputs
//! are fully on hand sorts ahead of one that needs a whole supply chain,
//! which steers the search toward shallow branches first.

use std::collections::BTreeMap;

use stratagem_planner::OrderingHookV1;

use crate::adapter::RecipePrereqsV1;

/// Total shortfall of one candidate's inputs against the held state.
fn deficiency(
    prereqs: &RecipePrereqsV1,
    state: &stratagem_kernel::state::StateV1,
    entity: &str,
) -> i64 {
    prereqs
        .consumes
        .iter()
        .chain(prereqs.requires.iter())
        .map(|(item, need)| (need - state.quantity(item, entity)).max(0))
        .sum()
}

/// Build the hook from the adapter's recipe index.
///
/// Candidate lists containing any method without an index entry (the
/// threshold and dispatch methods) pass through untouched; their order
/// is semantic, not a preference.
#[must_use]
pub fn deficiency_ordering(recipe_index: BTreeMap<String, RecipePrereqsV1>) -> OrderingHookV1 {
    OrderingHookV1::new("deficiency_ordering", move |ctx, candidates| {
        let Some(entity) = ctx.current_task.args.first().and_then(|a| a.as_sym()) else {
            return candidates;
        };
        if !candidates
            .iter()
            .all(|m| recipe_index.contains_key(&m.name))
        {
            return candidates;
        }
        let mut ranked = candidates;
        ranked.sort_by_cached_key(|m| {
            let prereqs = &recipe_index[&m.name];
            (
                deficiency(prereqs, ctx.state, entity),
                prereqs.time,
                m.name.clone(),
            )
        });
        ranked
    })
}
