//! Tasks: names plus fixed-arity argument tuples.
//!
//! A task is dispatched by name: the planner resolves it against the
//! method registry (compound) or the operator registry (primitive).
//! The task itself carries no state effect.

/// A task argument: a symbol (entity or item name) or a number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskArgV1 {
    /// Entity or item identifier.
    Sym(String),
    /// Quantity or threshold.
    Num(i64),
}

impl TaskArgV1 {
    /// Symbol payload, if this argument is a symbol.
    #[must_use]
    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Self::Sym(s) => Some(s),
            Self::Num(_) => None,
        }
    }

    /// Numeric payload, if this argument is a number.
    #[must_use]
    pub fn as_num(&self) -> Option<i64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Sym(_) => None,
        }
    }
}

impl std::fmt::Display for TaskArgV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sym(s) => f.write_str(s),
            Self::Num(n) => write!(f, "{n}"),
        }
    }
}

/// A task instance: name + arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskV1 {
    /// Dispatch name, e.g. `have_enough` or `op_punch_for_wood`.
    pub name: String,
    /// Fixed-arity argument tuple.
    pub args: Vec<TaskArgV1>,
}

impl TaskV1 {
    /// Build a task from a name and arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<TaskArgV1>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Canonical key string `name(arg,arg,…)`.
    ///
    /// Used for calling-stack repetition counting and the derive-once
    /// memo: two tasks with the same key are the same work item.
    #[must_use]
    pub fn key(&self) -> String {
        let mut key = self.name.clone();
        key.push('(');
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(&arg.to_string());
        }
        key.push(')');
        key
    }
}

impl std::fmt::Display for TaskV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// Convenience constructor for `have_enough`-style goal tasks.
#[must_use]
pub fn goal_task(name: &str, entity: &str, item: &str, qty: i64) -> TaskV1 {
    TaskV1::new(
        name,
        vec![
            TaskArgV1::Sym(entity.to_string()),
            TaskArgV1::Sym(item.to_string()),
            TaskArgV1::Num(qty),
        ],
    )
}

/// Read the conventional `(entity, item, qty)` argument layout.
///
/// Returns `None` when the task does not follow the layout; callers
/// treat that as the method/operator being inapplicable.
#[must_use]
pub fn entity_item_qty(args: &[TaskArgV1]) -> Option<(&str, &str, i64)> {
    match args {
        [TaskArgV1::Sym(entity), TaskArgV1::Sym(item), TaskArgV1::Num(qty)] => {
            Some((entity, item, *qty))
        }
        _ => None,
    }
}

/// Read the conventional `(entity, item)` argument layout.
#[must_use]
pub fn entity_item(args: &[TaskArgV1]) -> Option<(&str, &str)> {
    match args {
        [TaskArgV1::Sym(entity), TaskArgV1::Sym(item)] => Some((entity, item)),
        _ => None,
    }
}

/// Read the conventional single-`(entity)` argument layout.
#[must_use]
pub fn entity_only(args: &[TaskArgV1]) -> Option<&str> {
    match args {
        [TaskArgV1::Sym(entity)] => Some(entity),
        _ => None,
    }
}
