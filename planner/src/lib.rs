//! Stratagem Planner: recursive HTN decomposition with backtracking.
//!
//! This crate is the search engine. It consumes the registries and state
//! types from `stratagem_kernel` and knows nothing about any concrete
//! domain: methods and operators are opaque callables.
//!
//! # Key types
//!
//! - [`PlannerV1`] — owns registries, heuristic checks, the ordering
//!   hook, and the policy; one instance per planning run
//! - [`PlanPolicyV1`] — depth/repetition bounds and derive-once tasks
//! - [`HeuristicCheckV1`] — pruning predicate consulted before expansion
//! - [`OrderingHookV1`] — per-call re-ranking of candidate methods
//! - [`PlanResultV1`] — outcome plus the always-produced trace and stats
//! - [`PlanError`] — configuration defects (never ordinary search failure)

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod error;
pub mod heuristic;
pub mod ordering;
pub mod policy;
pub mod trace;

pub use engine::{PlanResultV1, PlannerV1, TerminationV1};
pub use error::PlanError;
pub use heuristic::{ExpansionContextV1, HeuristicCheckV1};
pub use ordering::OrderingHookV1;
pub use policy::PlanPolicyV1;
pub use trace::{PlanStatsV1, PlanTraceV1, TraceEventV1};
