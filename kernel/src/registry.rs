//! Method and operator registries: the planner's dispatch surface.
//!
//! Registries are populated once by the domain adapter before a run and
//! are read-only for the run's duration. Re-registering a task name
//! replaces the prior entry (idempotent overwrite, not append).
//!
//! The registry is the **contract surface**; the callables inside the
//! entries are the **implementation**. Both registries expose canonical
//! bytes built from their task → callable-name structure so a run
//! report can record what dispatch surface produced a plan.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::canon::canonical_json_bytes;
use crate::hash::{canonical_hash, ContentHash, DOMAIN_REGISTRY};
use crate::state::StateV1;
use crate::task::{TaskArgV1, TaskV1};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// What a method proposes for a compound task.
///
/// `Satisfied` is success-with-no-work: the condition the task expresses
/// already holds, so the task dissolves without adding subtasks. It is
/// deliberately a distinct variant from `Decomposed(vec![])` so that
/// check-style methods read unambiguously at the call site; the planner
/// treats the two identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodOutcomeV1 {
    /// Replace the task with these subtasks, in order.
    Decomposed(Vec<TaskV1>),
    /// The task's condition already holds; nothing to do.
    Satisfied,
    /// This method does not apply in the current state.
    Infeasible,
}

/// What an operator did with a primitive task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorOutcomeV1 {
    /// Preconditions held; this is the successor state.
    Applied(StateV1),
    /// Preconditions unmet (missing tool, missing consumable, or
    /// insufficient time budget). Ordinary backtracking signal.
    Inapplicable { detail: String },
}

// ---------------------------------------------------------------------------
// Callables
// ---------------------------------------------------------------------------

/// Method callable: pure function of (state, task args).
///
/// Methods inspect state and propose subtasks; they never mutate.
pub type MethodFn = Arc<dyn Fn(&StateV1, &[TaskArgV1]) -> MethodOutcomeV1 + Send + Sync>;

/// Operator callable: validates preconditions and produces a successor
/// state. Operators are the only component permitted to change state,
/// and they do so by returning a new value, never by writing in place.
pub type OperatorFn = Arc<dyn Fn(&StateV1, &[TaskArgV1]) -> OperatorOutcomeV1 + Send + Sync>;

/// A named candidate decomposition for a compound task.
///
/// The name is diagnostic (trace events, registry digest), not routing.
#[derive(Clone)]
pub struct MethodV1 {
    /// Diagnostic name, e.g. `check_enough` or `recipe:craft_plank`.
    pub name: String,
    func: MethodFn,
}

impl MethodV1 {
    /// Wrap a callable with its diagnostic name.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&StateV1, &[TaskArgV1]) -> MethodOutcomeV1 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Invoke the method.
    #[must_use]
    pub fn decompose(&self, state: &StateV1, args: &[TaskArgV1]) -> MethodOutcomeV1 {
        (self.func)(state, args)
    }
}

impl std::fmt::Debug for MethodV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodV1").field("name", &self.name).finish()
    }
}

/// A named operator for a primitive task.
#[derive(Clone)]
pub struct OperatorV1 {
    /// Diagnostic name, usually the recipe name.
    pub name: String,
    func: OperatorFn,
}

impl OperatorV1 {
    /// Wrap a callable with its diagnostic name.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&StateV1, &[TaskArgV1]) -> OperatorOutcomeV1 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Invoke the operator against the current state.
    #[must_use]
    pub fn apply(&self, state: &StateV1, args: &[TaskArgV1]) -> OperatorOutcomeV1 {
        (self.func)(state, args)
    }
}

impl std::fmt::Debug for OperatorV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorV1")
            .field("name", &self.name)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// Compound-task name → ordered candidate methods.
///
/// Candidate order is the default try order; the domain adapter is
/// expected to register cheaper methods first.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistryV1 {
    entries: BTreeMap<String, Vec<MethodV1>>,
}

impl MethodRegistryV1 {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the candidate list for a compound task, replacing any
    /// prior registration for the same name.
    pub fn register(&mut self, task_name: impl Into<String>, methods: Vec<MethodV1>) {
        self.entries.insert(task_name.into(), methods);
    }

    /// Candidate methods for a task name, in registration order.
    #[must_use]
    pub fn candidates(&self, task_name: &str) -> Option<&[MethodV1]> {
        self.entries.get(task_name).map(Vec::as_slice)
    }

    /// Whether the task name has a registration.
    #[must_use]
    pub fn contains(&self, task_name: &str) -> bool {
        self.entries.contains_key(task_name)
    }

    /// Number of registered compound task names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical bytes: task name → list of method names, sorted.
    ///
    /// # Panics
    ///
    /// Never panics: the serialized structure contains only strings.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut map = serde_json::Map::new();
        for (task, methods) in &self.entries {
            let names: Vec<serde_json::Value> = methods
                .iter()
                .map(|m| serde_json::Value::String(m.name.clone()))
                .collect();
            map.insert(task.clone(), serde_json::Value::Array(names));
        }
        canonical_json_bytes(&serde_json::Value::Object(map))
            .expect("registry structure is strings only")
    }

    /// Domain-separated digest of the canonical bytes.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        canonical_hash(DOMAIN_REGISTRY, &self.canonical_bytes())
    }
}

/// Primitive-task name → operator.
#[derive(Debug, Clone, Default)]
pub struct OperatorRegistryV1 {
    entries: BTreeMap<String, OperatorV1>,
}

impl OperatorRegistryV1 {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the operator for a primitive task, replacing any prior
    /// registration for the same name.
    pub fn register(&mut self, task_name: impl Into<String>, operator: OperatorV1) {
        self.entries.insert(task_name.into(), operator);
    }

    /// The operator for a task name.
    #[must_use]
    pub fn get(&self, task_name: &str) -> Option<&OperatorV1> {
        self.entries.get(task_name)
    }

    /// Whether the task name has a registered operator.
    ///
    /// The planner uses this to distinguish primitive from compound
    /// tasks: operator registration wins.
    #[must_use]
    pub fn contains(&self, task_name: &str) -> bool {
        self.entries.contains_key(task_name)
    }

    /// Number of registered operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical bytes: task name → operator name, sorted.
    ///
    /// # Panics
    ///
    /// Never panics: the serialized structure contains only strings.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut map = serde_json::Map::new();
        for (task, op) in &self.entries {
            map.insert(task.clone(), serde_json::Value::String(op.name.clone()));
        }
        canonical_json_bytes(&serde_json::Value::Object(map))
            .expect("registry structure is strings only")
    }

    /// Domain-separated digest of the canonical bytes.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        canonical_hash(DOMAIN_REGISTRY, &self.canonical_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::goal_task;

    fn satisfied_method(name: &str) -> MethodV1 {
        MethodV1::new(name, |_, _| MethodOutcomeV1::Satisfied)
    }

    fn reject_operator(name: &str) -> OperatorV1 {
        OperatorV1::new(name, |_, _| OperatorOutcomeV1::Inapplicable {
            detail: "never applies".into(),
        })
    }

    #[test]
    fn method_registration_and_lookup() {
        let mut reg = MethodRegistryV1::new();
        assert!(reg.is_empty());
        reg.register(
            "have_enough",
            vec![satisfied_method("check_enough"), satisfied_method("produce_enough")],
        );
        assert_eq!(reg.len(), 1);
        assert!(reg.contains("have_enough"));
        let candidates = reg.candidates("have_enough").unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "check_enough");
        assert!(reg.candidates("produce").is_none());
    }

    #[test]
    fn reregistration_replaces() {
        let mut reg = MethodRegistryV1::new();
        reg.register("produce", vec![satisfied_method("old")]);
        reg.register("produce", vec![satisfied_method("new_a"), satisfied_method("new_b")]);
        let candidates = reg.candidates("produce").unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "new_a");
    }

    #[test]
    fn operator_reregistration_replaces() {
        let mut reg = OperatorRegistryV1::new();
        reg.register("op_punch", reject_operator("old"));
        reg.register("op_punch", reject_operator("new"));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("op_punch").unwrap().name, "new");
    }

    #[test]
    fn methods_and_operators_invoke() {
        let method = MethodV1::new("decompose_once", |_, _| {
            MethodOutcomeV1::Decomposed(vec![goal_task("have_enough", "agent", "wood", 1)])
        });
        let state = StateV1::new();
        match method.decompose(&state, &[]) {
            MethodOutcomeV1::Decomposed(subtasks) => assert_eq!(subtasks.len(), 1),
            other => panic!("expected Decomposed, got {other:?}"),
        }

        let operator = OperatorV1::new("grant_wood", |state, _| {
            let mut next = state.clone();
            next.adjust("wood", "agent", 1);
            OperatorOutcomeV1::Applied(next)
        });
        match operator.apply(&state, &[]) {
            OperatorOutcomeV1::Applied(next) => {
                assert_eq!(next.quantity("wood", "agent"), 1);
                // Caller's state untouched.
                assert_eq!(state.quantity("wood", "agent"), 0);
            }
            OperatorOutcomeV1::Inapplicable { detail } => {
                panic!("expected Applied, got Inapplicable: {detail}")
            }
        }
    }

    #[test]
    fn digests_track_structure_not_insertion_order() {
        let mut a = MethodRegistryV1::new();
        a.register("produce", vec![satisfied_method("m1")]);
        a.register("have_enough", vec![satisfied_method("check")]);

        let mut b = MethodRegistryV1::new();
        b.register("have_enough", vec![satisfied_method("check")]);
        b.register("produce", vec![satisfied_method("m1")]);

        assert_eq!(a.digest(), b.digest());

        b.register("produce", vec![satisfied_method("m2")]);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn operator_digest_deterministic() {
        let mut reg = OperatorRegistryV1::new();
        reg.register("op_a", reject_operator("a"));
        reg.register("op_b", reject_operator("b"));
        let first = reg.digest();
        for _ in 0..5 {
            assert_eq!(reg.digest(), first);
        }
    }
}
