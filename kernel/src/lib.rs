//! Stratagem Kernel: pure value types for HTN planning.
//!
//! This crate holds the data model only — world state, tasks, and the
//! method/operator registries — plus the canonical serialization and
//! hashing used for determinism audits. It contains no search logic.
//!
//! # Crate dependency graph
//!
//! ```text
//! stratagem_kernel  ←  stratagem_planner  ←  stratagem_harness
//! (state, registries)  (backtracking engine)  (domain adapter, CLI)
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canon;
pub mod hash;
pub mod registry;
pub mod state;
pub mod task;
