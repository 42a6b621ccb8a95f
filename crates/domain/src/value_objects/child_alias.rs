//! Pseudonymous child key
//!
//! Continuity records are keyed by a salted hash of the parent account and
//! the child's name, so the raw name never reaches storage and two families
//! with a child of the same name never share memory.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const ALIAS_SALT: &[u8] = b"storiaai-child";

/// Deterministic, salted SHA-256 hex digest of a parent and child name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildAlias(String);

impl ChildAlias {
    /// Derive the alias for a parent's child; both parts are trimmed and
    /// lowercased
    pub fn for_child(parent_email: &str, name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(ALIAS_SALT);
        hasher.update(parent_email.trim().to_lowercase().as_bytes());
        // A valid email never contains NUL, so the first NUL marks the boundary
        hasher.update([0]);
        hasher.update(name.trim().to_lowercase().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChildAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: &str = "genitore@example.com";

    #[test]
    fn alias_ignores_case_and_whitespace() {
        assert_eq!(
            ChildAlias::for_child(" Genitore@Example.com", " Luca "),
            ChildAlias::for_child(PARENT, "luca")
        );
    }

    #[test]
    fn alias_is_hex_sha256() {
        let alias = ChildAlias::for_child(PARENT, "Luca");
        assert_eq!(alias.as_str().len(), 64);
        assert!(alias.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!alias.as_str().contains("luca"));
    }

    #[test]
    fn different_names_differ() {
        assert_ne!(
            ChildAlias::for_child(PARENT, "Luca"),
            ChildAlias::for_child(PARENT, "Anna")
        );
    }

    #[test]
    fn same_name_under_different_parents_differs() {
        assert_ne!(
            ChildAlias::for_child("alice@example.com", "Luca"),
            ChildAlias::for_child("bob@example.com", "Luca")
        );
    }

    #[test]
    fn parts_do_not_run_together() {
        assert_ne!(
            ChildAlias::for_child("a@b.it", "luca"),
            ChildAlias::for_child("a@b.itl", "uca")
        );
    }
}
