//! The planner engine: recursive depth-first decomposition with
//! backtracking over candidate methods.
//!
//! # Search node
//!
//! Each node is `(state, task_list, plan, depth, calling_stack, memo)`.
//! All six travel as owned values cloned at choice points, so the state
//! a sibling candidate observes after a failed subtree is bit-for-bit
//! the pre-attempt state — branch isolation falls out of ownership
//! rather than snapshot bookkeeping.
//!
//! # Dispatch
//!
//! A task is primitive iff the operator registry knows its name;
//! otherwise it is compound and must have methods registered, or the
//! run aborts with a configuration error. Depth and repetition bounds
//! are ordinary heuristic checks installed ahead of domain checks.

use std::collections::BTreeSet;

use stratagem_kernel::registry::{
    MethodOutcomeV1, MethodRegistryV1, OperatorOutcomeV1, OperatorRegistryV1,
};
use stratagem_kernel::state::StateV1;
use stratagem_kernel::task::TaskV1;

use crate::error::PlanError;
use crate::heuristic::{depth_bound, repetition_bound, ExpansionContextV1, HeuristicCheckV1};
use crate::ordering::{validate_permutation, OrderingHookV1};
use crate::policy::PlanPolicyV1;
use crate::trace::{PlanStatsV1, PlanTraceV1, TraceEventV1};

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationV1 {
    /// The task list emptied; the accumulated plan is a solution.
    GoalReached,
    /// Every candidate at the root failed. No plan exists under the
    /// current rules, goals, and bounds.
    Exhausted,
}

/// Result of a planning run.
///
/// Always carries the trace and stats regardless of how the search
/// terminated; check [`PlanResultV1::termination`] for the outcome.
#[derive(Debug, Clone)]
pub struct PlanResultV1 {
    /// The ordered primitive-task plan (present iff `GoalReached`).
    pub plan: Option<Vec<TaskV1>>,
    /// The state after applying the full plan (present iff `GoalReached`).
    pub final_state: Option<StateV1>,
    /// Why the search stopped.
    pub termination: TerminationV1,
    /// Aggregate counters.
    pub stats: PlanStatsV1,
    /// Event-level audit trail.
    pub trace: PlanTraceV1,
}

/// One planning problem's engine instance.
///
/// Owns the registries, checks, hook, and policy for the duration of a
/// run; holds no per-call state, so one instance can serve repeated
/// `plan` calls deterministically.
#[derive(Debug)]
pub struct PlannerV1 {
    methods: MethodRegistryV1,
    operators: OperatorRegistryV1,
    checks: Vec<HeuristicCheckV1>,
    ordering: Option<OrderingHookV1>,
    policy: PlanPolicyV1,
}

/// A search node. Cheap to clone relative to search cost; cloned once
/// per candidate attempt and once per operator application.
#[derive(Debug, Clone)]
struct NodeV1 {
    state: StateV1,
    tasks: Vec<TaskV1>,
    plan: Vec<TaskV1>,
    depth: u32,
    calling_stack: Vec<StackFrameV1>,
    memo: BTreeSet<String>,
}

/// One calling-stack frame: a compound task whose decomposition is
/// still being worked through.
///
/// `tail_len` is the number of tasks in the list that lie beyond this
/// frame's decomposition. Once the task list shrinks to that length the
/// frame's subtasks are fully consumed and the frame is no longer an
/// ancestor; [`PlannerV1::seek_compound`] trims such frames before
/// counting repetitions, so a completed produce-and-recheck cycle does
/// not accumulate against the repetition bound the way live recursion
/// does.
#[derive(Debug, Clone)]
struct StackFrameV1 {
    key: String,
    tail_len: usize,
}

/// Outcome of one subtree: solved (with the witness) or exhausted.
enum SeekOutcomeV1 {
    Solved { plan: Vec<TaskV1>, state: StateV1 },
    Exhausted,
}

impl PlannerV1 {
    /// Build a planner over populated registries.
    ///
    /// Installs the built-in depth and repetition checks from the policy
    /// ahead of any later domain checks.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidPolicy`] if the policy fails
    /// pre-flight validation.
    pub fn new(
        methods: MethodRegistryV1,
        operators: OperatorRegistryV1,
        policy: PlanPolicyV1,
    ) -> Result<Self, PlanError> {
        policy.validate()?;
        let checks = vec![
            depth_bound(policy.max_depth),
            repetition_bound(policy.max_task_repeats),
        ];
        Ok(Self {
            methods,
            operators,
            checks,
            ordering: None,
            policy,
        })
    }

    /// Append a domain heuristic check. Checks run in registration
    /// order after the built-ins.
    pub fn add_check(&mut self, check: HeuristicCheckV1) {
        self.checks.push(check);
    }

    /// Install the ordering hook, replacing any prior hook.
    pub fn set_ordering(&mut self, hook: OrderingHookV1) {
        self.ordering = Some(hook);
    }

    /// The method registry (read-only during a run).
    #[must_use]
    pub fn methods(&self) -> &MethodRegistryV1 {
        &self.methods
    }

    /// The operator registry (read-only during a run).
    #[must_use]
    pub fn operators(&self) -> &OperatorRegistryV1 {
        &self.operators
    }

    /// Search for a plan that discharges `goals` from `initial_state`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] only for configuration defects: an
    /// unregistered compound task or an ordering hook that breaks its
    /// permutation contract. Search exhaustion is an `Ok` result with
    /// [`TerminationV1::Exhausted`].
    pub fn plan(
        &self,
        initial_state: &StateV1,
        goals: Vec<TaskV1>,
    ) -> Result<PlanResultV1, PlanError> {
        let mut trace = PlanTraceV1::default();
        let mut stats = PlanStatsV1::default();

        let root = NodeV1 {
            state: initial_state.clone(),
            tasks: goals,
            plan: Vec::new(),
            depth: 0,
            calling_stack: Vec::new(),
            memo: BTreeSet::new(),
        };

        match self.seek(&root, &mut trace, &mut stats)? {
            SeekOutcomeV1::Solved { plan, state } => Ok(PlanResultV1 {
                plan: Some(plan),
                final_state: Some(state),
                termination: TerminationV1::GoalReached,
                stats,
                trace,
            }),
            SeekOutcomeV1::Exhausted => Ok(PlanResultV1 {
                plan: None,
                final_state: None,
                termination: TerminationV1::Exhausted,
                stats,
                trace,
            }),
        }
    }

    fn seek(
        &self,
        node: &NodeV1,
        trace: &mut PlanTraceV1,
        stats: &mut PlanStatsV1,
    ) -> Result<SeekOutcomeV1, PlanError> {
        stats.max_depth_reached = stats.max_depth_reached.max(node.depth);

        let Some((head, tail)) = node.tasks.split_first() else {
            return Ok(SeekOutcomeV1::Solved {
                plan: node.plan.clone(),
                state: node.state.clone(),
            });
        };

        if self.operators.contains(&head.name) {
            self.seek_primitive(node, head, tail, trace, stats)
        } else {
            self.seek_compound(node, head, tail, trace, stats)
        }
    }

    fn seek_primitive(
        &self,
        node: &NodeV1,
        head: &TaskV1,
        tail: &[TaskV1],
        trace: &mut PlanTraceV1,
        stats: &mut PlanStatsV1,
    ) -> Result<SeekOutcomeV1, PlanError> {
        // contains() was checked by the dispatcher.
        let Some(operator) = self.operators.get(&head.name) else {
            return Err(PlanError::UnregisteredCompoundTask { task: head.key() });
        };

        match operator.apply(&node.state, &head.args) {
            OperatorOutcomeV1::Applied(next_state) => {
                stats.operator_applications += 1;
                trace.record(TraceEventV1::OperatorApplied { task: head.key() });

                let mut plan = node.plan.clone();
                plan.push(head.clone());
                let child = NodeV1 {
                    state: next_state,
                    tasks: tail.to_vec(),
                    plan,
                    depth: node.depth + 1,
                    calling_stack: node.calling_stack.clone(),
                    memo: node.memo.clone(),
                };
                self.seek(&child, trace, stats)
            }
            OperatorOutcomeV1::Inapplicable { detail } => {
                stats.operator_rejections += 1;
                trace.record(TraceEventV1::OperatorRejected {
                    task: head.key(),
                    detail,
                });
                Ok(SeekOutcomeV1::Exhausted)
            }
        }
    }

    fn seek_compound(
        &self,
        node: &NodeV1,
        head: &TaskV1,
        tail: &[TaskV1],
        trace: &mut PlanTraceV1,
        stats: &mut PlanStatsV1,
    ) -> Result<SeekOutcomeV1, PlanError> {
        // A frame whose recorded tail is at least as long as the current
        // tail has no subtasks pending beyond this head: either the head
        // already sits in the frame's original tail, or it is the frame's
        // final subtask. Such frames are finished, not live ancestors.
        let mut calling_stack = node.calling_stack.clone();
        while calling_stack
            .last()
            .is_some_and(|frame| frame.tail_len >= tail.len())
        {
            calling_stack.pop();
        }
        let ancestor_keys: Vec<String> = calling_stack
            .iter()
            .map(|frame| frame.key.clone())
            .collect();

        let ctx = ExpansionContextV1 {
            state: &node.state,
            current_task: head,
            remaining_tasks: tail,
            plan: &node.plan,
            depth: node.depth,
            calling_stack: &ancestor_keys,
        };

        for check in &self.checks {
            if check.should_prune(&ctx) {
                stats.branches_pruned += 1;
                trace.record(TraceEventV1::BranchPruned {
                    task: head.key(),
                    check: check.name.clone(),
                });
                return Ok(SeekOutcomeV1::Exhausted);
            }
        }

        // Derive-once memo: a second expansion of the same key on this
        // path is pruned, same propagation as a heuristic prune.
        let head_key = head.key();
        let mut memo = node.memo.clone();
        if self.policy.derive_once_tasks.contains(&head.name) {
            if memo.contains(&head_key) {
                stats.branches_pruned += 1;
                trace.record(TraceEventV1::BranchPruned {
                    task: head_key,
                    check: "derive_once".into(),
                });
                return Ok(SeekOutcomeV1::Exhausted);
            }
            memo.insert(head_key.clone());
        }

        let Some(registered) = self.methods.candidates(&head.name) else {
            return Err(PlanError::UnregisteredCompoundTask { task: head.key() });
        };

        let candidates = match &self.ordering {
            Some(hook) => {
                let ranked = hook.rank(&ctx, registered.to_vec());
                validate_permutation(&hook.name, registered, &ranked)?;
                ranked
            }
            None => registered.to_vec(),
        };

        stats.expansions += 1;
        trace.record(TraceEventV1::TaskExpanded {
            task: head.key(),
            candidates: candidates.len(),
        });

        calling_stack.push(StackFrameV1 {
            key: head.key(),
            tail_len: tail.len(),
        });

        for method in &candidates {
            trace.record(TraceEventV1::MethodAttempted {
                task: head.key(),
                method: method.name.clone(),
            });

            let subtasks = match method.decompose(&node.state, &head.args) {
                MethodOutcomeV1::Infeasible => {
                    stats.methods_infeasible += 1;
                    trace.record(TraceEventV1::MethodInfeasible {
                        task: head.key(),
                        method: method.name.clone(),
                    });
                    continue;
                }
                MethodOutcomeV1::Satisfied => Vec::new(),
                MethodOutcomeV1::Decomposed(subtasks) => subtasks,
            };

            let mut tasks = subtasks;
            tasks.extend_from_slice(tail);

            // State, plan, and memo are clones: a failed subtree leaves
            // this node's values untouched for the next candidate.
            let child = NodeV1 {
                state: node.state.clone(),
                tasks,
                plan: node.plan.clone(),
                depth: node.depth + 1,
                calling_stack: calling_stack.clone(),
                memo: memo.clone(),
            };

            match self.seek(&child, trace, stats)? {
                solved @ SeekOutcomeV1::Solved { .. } => return Ok(solved),
                SeekOutcomeV1::Exhausted => {
                    stats.backtracks += 1;
                    trace.record(TraceEventV1::Backtracked {
                        task: head.key(),
                        method: method.name.clone(),
                    });
                }
            }
        }

        Ok(SeekOutcomeV1::Exhausted)
    }
}
