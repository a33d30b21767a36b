//! Typed planner errors.
//!
//! `PlanError` covers configuration defects only: a missing method
//! registration, a misbehaving ordering hook, an invalid policy. Ordinary
//! search outcomes — branch failure, pruning, exhaustion — travel through
//! [`crate::engine::PlanResultV1`] and are never represented as `Err`.

/// Fatal configuration error detected before or during a run.
///
/// These indicate a defect in the domain adapter's setup, not an
/// unreachable goal, and must be surfaced distinctly from "no plan".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A compound task reached the engine with no registered methods.
    /// The domain adapter failed to provide a decomposition rule.
    UnregisteredCompoundTask { task: String },
    /// The ordering hook returned something other than a permutation of
    /// its input candidate list.
    OrderingContractViolation { hook: String, detail: String },
    /// The policy fails validation (zero bounds).
    InvalidPolicy { detail: String },
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnregisteredCompoundTask { task } => {
                write!(f, "no methods registered for compound task {task}")
            }
            Self::OrderingContractViolation { hook, detail } => {
                write!(f, "ordering hook {hook} violated its contract: {detail}")
            }
            Self::InvalidPolicy { detail } => write!(f, "invalid plan policy: {detail}"),
        }
    }
}

impl std::error::Error for PlanError {}
