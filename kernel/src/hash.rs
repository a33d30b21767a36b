//! Canonical hashing types and domain separation constants.
//!
//! Algorithm: SHA-256 for all V1 artifacts. Each hashing context gets
//! its own null-terminated domain prefix so that, e.g., a state and a
//! registry that happen to canonicalize to the same bytes still produce
//! distinct digests.

use sha2::{Digest, Sha256};

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`).
///
/// Invariant: the inner string contains exactly one `:` separator with
/// non-empty substrings on both sides (enforced by [`ContentHash::parse`]
/// and by construction in [`canonical_hash`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` on a missing colon, empty algorithm, or empty digest.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (e.g., "sha256").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    /// The full `"algorithm:hex_digest"` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

// Domain separation constants. Each prefix is null-terminated.

/// Domain prefix for world state fingerprints.
pub const DOMAIN_STATE: &[u8] = b"STRATAGEM::STATE::V1\0";

/// Domain prefix for method/operator registry digests.
pub const DOMAIN_REGISTRY: &[u8] = b"STRATAGEM::REGISTRY::V1\0";

/// Domain prefix for rule-set digests.
pub const DOMAIN_RULESET: &[u8] = b"STRATAGEM::RULESET::V1\0";

/// Domain prefix for plan digests.
pub const DOMAIN_PLAN: &[u8] = b"STRATAGEM::PLAN::V1\0";

/// Compute the canonical hash of a byte slice with domain separation.
///
/// Result format: `"sha256:<hex_digest>"`.
#[must_use]
pub fn canonical_hash(domain: &[u8], data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    ContentHash {
        colon: "sha256".len(),
        full: format!("sha256:{digest}"),
    }
}
