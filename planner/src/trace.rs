//! Search audit trail: trace events and counters.
//!
//! Every run produces a trace and stats regardless of outcome, so a
//! "no plan found" can be diagnosed after the fact. Rendering is the
//! caller's concern; the engine only records.

/// One event on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEventV1 {
    /// A compound task reached expansion with this many candidates
    /// (post-ordering).
    TaskExpanded { task: String, candidates: usize },
    /// A candidate method was invoked.
    MethodAttempted { task: String, method: String },
    /// The candidate reported itself inapplicable.
    MethodInfeasible { task: String, method: String },
    /// A primitive task's operator applied successfully.
    OperatorApplied { task: String },
    /// A primitive task's operator refused to apply.
    OperatorRejected { task: String, detail: String },
    /// A heuristic check (or the derive-once memo) cut the branch.
    BranchPruned { task: String, check: String },
    /// A candidate's subtree failed; the pre-attempt snapshot is live
    /// again and the next candidate will be tried.
    Backtracked { task: String, method: String },
}

/// Accumulated trace for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanTraceV1 {
    /// Events in occurrence order.
    pub events: Vec<TraceEventV1>,
}

impl PlanTraceV1 {
    pub(crate) fn record(&mut self, event: TraceEventV1) {
        self.events.push(event);
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStatsV1 {
    /// Compound-task expansions attempted.
    pub expansions: u64,
    /// Operators applied (including those later backtracked over).
    pub operator_applications: u64,
    /// Operators that refused to apply.
    pub operator_rejections: u64,
    /// Methods that reported Infeasible.
    pub methods_infeasible: u64,
    /// Branches cut by heuristic checks or the derive-once memo.
    pub branches_pruned: u64,
    /// Candidate subtrees abandoned after failure.
    pub backtracks: u64,
    /// Deepest node reached.
    pub max_depth_reached: u32,
}
