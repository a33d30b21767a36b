//! Stratagem Harness: the crafting domain on top of the planner.
//!
//! The harness owns everything rule-file-shaped: parsing and validating
//! catalogs, compiling them into method/operator registries, the domain
//! heuristics and ordering hook, and the end-to-end runner that plans
//! and then replay-validates the result.
//!
//! The harness does NOT implement search — it delegates to the planner.
//! Rule files provide domain data only; the harness owns compilation.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adapter;
pub mod fixtures;
pub mod heuristics;
pub mod ordering;
pub mod rules;
pub mod runner;
