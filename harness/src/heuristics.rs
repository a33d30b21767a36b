//! Crafting-domain pruning checks.
//!
//! These encode world knowledge the generic bounds cannot: which tool
//! productions are detours for the problem at hand. Each check is only
//! installed when the catalog declares the names it reasons about, so a
//! rule set without axes simply gets fewer checks.

use stratagem_planner::HeuristicCheckV1;

use crate::adapter::{produce_task_name, TASK_HAVE_ENOUGH, TASK_PRODUCE, TASK_PRODUCE_ONCE, VAR_TIME};
use crate::rules::RuleSetV1;

/// Whether `task` is a production task for `item`, in either the
/// dispatch form `produce*(entity, item)` or the routed form
/// `produce_<item>(entity)`.
fn is_producing(task: &stratagem_kernel::task::TaskV1, item: &str) -> bool {
    if task.name == TASK_PRODUCE || task.name == TASK_PRODUCE_ONCE {
        return task.args.get(1).and_then(|a| a.as_sym()) == Some(item);
    }
    task.name == produce_task_name(item)
}

/// Whether a `have_enough` threshold goal for `item` sits in the queue.
fn item_pending(tasks: &[stratagem_kernel::task::TaskV1], item: &str) -> bool {
    tasks.iter().any(|t| {
        t.name == TASK_HAVE_ENOUGH && t.args.get(1).and_then(|a| a.as_sym()) == Some(item)
    })
}

/// Time cost of gathering one wood bare-handed: the cheapest recipe that
/// yields wood with no tools and no inputs. Falls back to 4 when the
/// catalog has no such recipe.
fn bare_hand_wood_time(rules: &RuleSetV1) -> i64 {
    rules
        .recipes
        .values()
        .filter(|r| {
            r.produces.contains_key("wood") && r.requires.is_empty() && r.consumes.is_empty()
        })
        .map(|r| r.time)
        .min()
        .unwrap_or(4)
}

/// An iron axe only speeds up wood gathering; if the goal never asks for
/// one, crafting it is always a detour.
fn skip_unneeded_iron_axe(rules: &RuleSetV1) -> HeuristicCheckV1 {
    let goal_wants_it = rules.problem.goal.contains_key("iron_axe");
    HeuristicCheckV1::new("skip_unneeded_iron_axe", move |ctx| {
        !goal_wants_it && is_producing(ctx.current_task, "iron_axe")
    })
}

/// Skip wooden/stone axe production when bare-handed gathering covers
/// the whole remaining wood demand within the time budget.
///
/// Demand is counted in eighths of a wood unit so plank (4 per wood) and
/// stick (8 per wood) goals fold in without fractions.
fn punch_beats_axes(rules: &RuleSetV1) -> HeuristicCheckV1 {
    let goal = &rules.problem.goal;
    let goal_wants_axe =
        goal.contains_key("wooden_axe") || goal.contains_key("stone_axe");
    let demand_x8 = 8 * goal.get("wood").copied().unwrap_or(0)
        + 2 * goal.get("plank").copied().unwrap_or(0)
        + goal.get("stick").copied().unwrap_or(0);
    let punch_time = bare_hand_wood_time(rules);
    HeuristicCheckV1::new("punch_beats_axes", move |ctx| {
        if goal_wants_axe {
            return false;
        }
        let targets_axe = is_producing(ctx.current_task, "wooden_axe")
            || is_producing(ctx.current_task, "stone_axe");
        if !targets_axe {
            return false;
        }
        let entity = match ctx.current_task.args.first().and_then(|a| a.as_sym()) {
            Some(e) => e,
            None => return false,
        };
        let held_x8 = 8 * ctx.state.quantity("wood", entity);
        let still_needed_x8 = (demand_x8 - held_x8).max(0);
        let budget = ctx.state.quantity(VAR_TIME, entity);
        punch_time * still_needed_x8 <= 8 * budget
    })
}

/// Never craft an iron pickaxe while a stone pickaxe goal is still
/// queued: the stone tier is its prerequisite and must come first.
fn stone_pickaxe_first() -> HeuristicCheckV1 {
    HeuristicCheckV1::new("stone_pickaxe_first", |ctx| {
        is_producing(ctx.current_task, "iron_pickaxe")
            && item_pending(ctx.remaining_tasks, "stone_pickaxe")
    })
}

/// Build the domain checks applicable to this catalog.
#[must_use]
pub fn domain_checks(rules: &RuleSetV1) -> Vec<HeuristicCheckV1> {
    let mut checks = Vec::new();
    if rules.is_tool("iron_axe") {
        checks.push(skip_unneeded_iron_axe(rules));
    }
    if rules.is_tool("wooden_axe") || rules.is_tool("stone_axe") {
        checks.push(punch_beats_axes(rules));
    }
    if rules.is_tool("iron_pickaxe") && rules.is_tool("stone_pickaxe") {
        checks.push(stone_pickaxe_first());
    }
    checks
}
