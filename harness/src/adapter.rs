//! Domain adapter: turns a rule set into the engine-facing surface.
//!
//! Built once per run: method/operator registries, the initial state,
//! the goal task list, the policy, and a recipe index the ordering hook
//! uses to rank candidates. The engine never sees recipes — only the
//! opaque callables built here.
//!
//! # Task vocabulary
//!
//! - `have_enough(entity, item, qty)` — compound; check-then-produce.
//! - `produce(entity, item)` / `produce_once(entity, item)` — compound;
//!   dispatches to the item's production task. Tools route through
//!   `produce_once`, which the policy marks derive-once so a tool is
//!   never crafted twice on one path.
//! - `produce_<item>(entity)` — compound; one method per recipe that
//!   yields the item, cheapest time first.
//! - `op_<recipe>(entity)` — primitive; validates and applies the recipe.

use std::collections::{BTreeMap, BTreeSet};

use stratagem_kernel::registry::{
    MethodOutcomeV1, MethodRegistryV1, MethodV1, OperatorOutcomeV1, OperatorRegistryV1, OperatorV1,
};
use stratagem_kernel::state::StateV1;
use stratagem_kernel::task::{entity_item, entity_item_qty, entity_only, goal_task, TaskArgV1, TaskV1};
use stratagem_planner::PlanPolicyV1;

use crate::rules::{RecipeV1, RuleSetV1};

/// Compound task name for threshold goals.
pub const TASK_HAVE_ENOUGH: &str = "have_enough";

/// Compound task name for producing one unit of an item.
pub const TASK_PRODUCE: &str = "produce";

/// Variant of `produce` for tools; marked derive-once in the policy.
pub const TASK_PRODUCE_ONCE: &str = "produce_once";

/// State variable holding the consumable time budget.
pub const VAR_TIME: &str = "time";

/// Prerequisites of one recipe-backed method, for the ordering hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePrereqsV1 {
    /// Items the recipe consumes.
    pub consumes: BTreeMap<String, i64>,
    /// Tools the recipe requires.
    pub requires: BTreeMap<String, i64>,
    /// Time-budget cost.
    pub time: i64,
}

/// Everything the engine needs for one problem, built from a rule set.
#[derive(Debug)]
pub struct DomainV1 {
    /// Compound-task decompositions.
    pub methods: MethodRegistryV1,
    /// Primitive-task operators.
    pub operators: OperatorRegistryV1,
    /// `Items ∪ Tools` zeroed, overlaid with `Initial`, plus `time`.
    pub initial_state: StateV1,
    /// One `have_enough` per `Problem.Goal` entry.
    pub goals: Vec<TaskV1>,
    /// Default bounds plus derive-once registration for tools.
    pub policy: PlanPolicyV1,
    /// Method name (recipe name) → prerequisites, for ordering.
    pub recipe_index: BTreeMap<String, RecipePrereqsV1>,
}

/// Primitive task name for a recipe: `op_<recipe>` with spaces folded.
#[must_use]
pub fn op_task_name(recipe_name: &str) -> String {
    format!("op_{}", recipe_name.replace(' ', "_"))
}

/// Production task name for an item: `produce_<item>`.
#[must_use]
pub fn produce_task_name(item: &str) -> String {
    format!("produce_{item}")
}

/// Build the full engine-facing surface for one entity.
#[must_use]
pub fn build_domain(rules: &RuleSetV1, entity: &str) -> DomainV1 {
    let tools: BTreeSet<String> = rules.tools.iter().cloned().collect();

    let mut methods = MethodRegistryV1::new();
    methods.register(
        TASK_HAVE_ENOUGH,
        vec![check_enough_method(), produce_enough_method(tools.clone())],
    );

    // produce/produce_once share one dispatcher; only the policy
    // treatment differs.
    let producible: BTreeSet<String> = rules
        .recipes
        .values()
        .flat_map(|r| r.produces.keys().cloned())
        .collect();
    let dispatcher = produce_dispatch_method(producible);
    methods.register(TASK_PRODUCE, vec![dispatcher.clone()]);
    methods.register(TASK_PRODUCE_ONCE, vec![dispatcher]);

    // Group recipes by product, cheapest first, and register one
    // production task per product.
    let mut by_product: BTreeMap<&str, Vec<(&String, &RecipeV1)>> = BTreeMap::new();
    for (name, recipe) in &rules.recipes {
        for product in recipe.produces.keys() {
            by_product.entry(product).or_default().push((name, recipe));
        }
    }
    let mut recipe_index = BTreeMap::new();
    for (product, mut entries) in by_product {
        entries.sort_by(|a, b| a.1.time.cmp(&b.1.time).then_with(|| a.0.cmp(b.0)));
        let candidates: Vec<MethodV1> = entries
            .iter()
            .map(|(name, recipe)| {
                recipe_index.insert(
                    (*name).clone(),
                    RecipePrereqsV1 {
                        consumes: recipe.consumes.clone(),
                        requires: recipe.requires.clone(),
                        time: recipe.time,
                    },
                );
                recipe_method(name, recipe)
            })
            .collect();
        methods.register(produce_task_name(product), candidates);
    }

    let mut operators = OperatorRegistryV1::new();
    for (name, recipe) in &rules.recipes {
        operators.register(op_task_name(name), recipe_operator(name, recipe));
    }

    let mut initial_state = StateV1::new();
    for var in rules.items.iter().chain(rules.tools.iter()) {
        initial_state.set_quantity(var, entity, 0);
    }
    for (var, qty) in &rules.problem.initial {
        initial_state.set_quantity(var, entity, *qty);
    }
    initial_state.set_quantity(VAR_TIME, entity, rules.problem.time);

    let goals = rules
        .problem
        .goal
        .iter()
        .map(|(item, qty)| goal_task(TASK_HAVE_ENOUGH, entity, item, *qty))
        .collect();

    let policy = PlanPolicyV1 {
        derive_once_tasks: [TASK_PRODUCE_ONCE.to_string()].into_iter().collect(),
        ..PlanPolicyV1::default()
    };

    DomainV1 {
        methods,
        operators,
        initial_state,
        goals,
        policy,
        recipe_index,
    }
}

/// `check_enough`: Satisfied when the held quantity meets the threshold.
fn check_enough_method() -> MethodV1 {
    MethodV1::new("check_enough", |state, args| {
        let Some((entity, item, qty)) = entity_item_qty(args) else {
            return MethodOutcomeV1::Infeasible;
        };
        if state.quantity(item, entity) >= qty {
            MethodOutcomeV1::Satisfied
        } else {
            MethodOutcomeV1::Infeasible
        }
    })
}

/// `produce_enough`: produce one unit, then re-check the threshold.
fn produce_enough_method(tools: BTreeSet<String>) -> MethodV1 {
    MethodV1::new("produce_enough", move |_, args| {
        let Some((entity, item, qty)) = entity_item_qty(args) else {
            return MethodOutcomeV1::Infeasible;
        };
        let produce = if tools.contains(item) {
            TASK_PRODUCE_ONCE
        } else {
            TASK_PRODUCE
        };
        MethodOutcomeV1::Decomposed(vec![
            TaskV1::new(
                produce,
                vec![
                    TaskArgV1::Sym(entity.to_string()),
                    TaskArgV1::Sym(item.to_string()),
                ],
            ),
            goal_task(TASK_HAVE_ENOUGH, entity, item, qty),
        ])
    })
}

/// Dispatch `produce(entity, item)` to the item's production task.
fn produce_dispatch_method(producible: BTreeSet<String>) -> MethodV1 {
    MethodV1::new("dispatch_produce", move |_, args| {
        let Some((entity, item)) = entity_item(args) else {
            return MethodOutcomeV1::Infeasible;
        };
        if !producible.contains(item) {
            // No recipe yields this item; dead end, not a config error —
            // the item may still be covered by Initial inventory.
            return MethodOutcomeV1::Infeasible;
        }
        MethodOutcomeV1::Decomposed(vec![TaskV1::new(
            produce_task_name(item),
            vec![TaskArgV1::Sym(entity.to_string())],
        )])
    })
}

/// One recipe's decomposition: consume subgoals, tool subgoals, then the
/// primitive application.
fn recipe_method(recipe_name: &str, recipe: &RecipeV1) -> MethodV1 {
    let consumes = recipe.consumes.clone();
    let requires = recipe.requires.clone();
    let op_task = op_task_name(recipe_name);
    MethodV1::new(recipe_name, move |_, args| {
        let Some(entity) = entity_only(args) else {
            return MethodOutcomeV1::Infeasible;
        };
        let mut subtasks = Vec::with_capacity(consumes.len() + requires.len() + 1);
        for (item, qty) in &consumes {
            subtasks.push(goal_task(TASK_HAVE_ENOUGH, entity, item, *qty));
        }
        for (tool, qty) in &requires {
            subtasks.push(goal_task(TASK_HAVE_ENOUGH, entity, tool, *qty));
        }
        subtasks.push(TaskV1::new(
            op_task.clone(),
            vec![TaskArgV1::Sym(entity.to_string())],
        ));
        MethodOutcomeV1::Decomposed(subtasks)
    })
}

/// One recipe's operator: validate Requires, Consumes, and the time
/// budget, then apply the effect as a new state.
fn recipe_operator(recipe_name: &str, recipe: &RecipeV1) -> OperatorV1 {
    let produces = recipe.produces.clone();
    let requires = recipe.requires.clone();
    let consumes = recipe.consumes.clone();
    let time = recipe.time;
    OperatorV1::new(recipe_name, move |state, args| {
        let Some(entity) = entity_only(args) else {
            return OperatorOutcomeV1::Inapplicable {
                detail: "expected (entity)".into(),
            };
        };
        for (tool, needed) in &requires {
            let held = state.quantity(tool, entity);
            if held < *needed {
                return OperatorOutcomeV1::Inapplicable {
                    detail: format!("missing tool {tool}: have {held}, need {needed}"),
                };
            }
        }
        for (item, needed) in &consumes {
            let held = state.quantity(item, entity);
            if held < *needed {
                return OperatorOutcomeV1::Inapplicable {
                    detail: format!("insufficient {item}: have {held}, need {needed}"),
                };
            }
        }
        let budget = state.quantity(VAR_TIME, entity);
        if budget < time {
            return OperatorOutcomeV1::Inapplicable {
                detail: format!("insufficient time: have {budget}, need {time}"),
            };
        }

        let mut next = state.clone();
        for (item, qty) in &consumes {
            next.adjust(item, entity, -qty);
        }
        for (item, qty) in &produces {
            next.adjust(item, entity, *qty);
        }
        next.adjust(VAR_TIME, entity, -time);
        OperatorOutcomeV1::Applied(next)
    })
}
