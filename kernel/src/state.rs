//! `StateV1`: the mutable world-state snapshot.
//!
//! A state is a map of variable name → (entity id → quantity). Item and
//! tool counts and the consumable `time` budget are all ordinary
//! variables; multiple entities may share one state, keyed by entity id.
//!
//! States are owned values: the planner threads fresh clones through
//! recursion so a failed branch can never leak a mutation into its
//! siblings. `BTreeMap` at both levels keeps iteration — and therefore
//! canonical bytes and fingerprints — deterministic.

use std::collections::BTreeMap;

use crate::canon::canonical_json_bytes;
use crate::hash::{canonical_hash, ContentHash, DOMAIN_STATE};

/// World state: variable → entity → quantity.
///
/// Quantities are `i64` so arithmetic during operator checks can go
/// transiently negative in expressions; a stored quantity is expected to
/// stay ≥ 0, and operators must refuse to apply rather than store a
/// negative value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateV1 {
    vars: BTreeMap<String, BTreeMap<String, i64>>,
}

impl StateV1 {
    /// An empty state with no variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a quantity. Missing variable or entity reads as 0.
    #[must_use]
    pub fn quantity(&self, var: &str, entity: &str) -> i64 {
        self.vars
            .get(var)
            .and_then(|per_entity| per_entity.get(entity))
            .copied()
            .unwrap_or(0)
    }

    /// Set a quantity, creating the variable/entity entry as needed.
    pub fn set_quantity(&mut self, var: &str, entity: &str, qty: i64) {
        self.vars
            .entry(var.to_string())
            .or_default()
            .insert(entity.to_string(), qty);
    }

    /// Add `delta` (may be negative) to a quantity and return the new value.
    pub fn adjust(&mut self, var: &str, entity: &str, delta: i64) -> i64 {
        let slot = self
            .vars
            .entry(var.to_string())
            .or_default()
            .entry(entity.to_string())
            .or_insert(0);
        *slot += delta;
        *slot
    }

    /// Whether the variable exists (even if all its quantities are 0).
    #[must_use]
    pub fn has_var(&self, var: &str) -> bool {
        self.vars.contains_key(var)
    }

    /// Iterate `(variable, entity, quantity)` in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, i64)> {
        self.vars.iter().flat_map(|(var, per_entity)| {
            per_entity
                .iter()
                .map(move |(entity, qty)| (var.as_str(), entity.as_str(), *qty))
        })
    }

    /// Canonical bytes for hashing: sorted variable → entity → quantity.
    ///
    /// # Panics
    ///
    /// Never panics: quantities are integers, which canonical JSON accepts.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut vars = serde_json::Map::new();
        for (var, per_entity) in &self.vars {
            let mut entities = serde_json::Map::new();
            for (entity, qty) in per_entity {
                entities.insert(entity.clone(), serde_json::Value::from(*qty));
            }
            vars.insert(var.clone(), serde_json::Value::Object(entities));
        }
        canonical_json_bytes(&serde_json::Value::Object(vars))
            .expect("state quantities are integers")
    }

    /// Domain-separated fingerprint of the canonical bytes.
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        canonical_hash(DOMAIN_STATE, &self.canonical_bytes())
    }
}
