//! # Beneficiary Whitelist
//!
//! Each account carries a directed whitelist of counterparty addresses it
//! may transfer to. An edge `(owner -> beneficiary)` exists only if the
//! owner explicitly added it, and at most once per ordered pair. Membership
//! alone is not enough to receive a transfer — the counterparty's status is
//! re-validated at transfer time by the service layer, not only at add time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The set of transfer-eligible counterparty addresses for one account.
///
/// Insertion order is irrelevant and duplicates are rejected. Status checks
/// on the endpoints live in the service layer, which can see the registry;
/// this type owns only the uniqueness invariant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeneficiarySet {
    entries: HashSet<String>,
}

impl BeneficiarySet {
    /// Creates an empty whitelist.
    pub fn new() -> Self {
        Self {
            entries: HashSet::new(),
        }
    }

    /// Adds a beneficiary address.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BeneficiaryExists`] if the edge is already
    /// present.
    pub fn add(&mut self, address: impl Into<String>) -> Result<(), LedgerError> {
        if !self.entries.insert(address.into()) {
            return Err(LedgerError::BeneficiaryExists);
        }
        Ok(())
    }

    /// Membership test used by the transfer path.
    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains(address)
    }

    /// Returns the number of beneficiaries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no beneficiary has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the beneficiary addresses in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_contains() {
        let mut set = BeneficiarySet::new();
        set.add("mer:bob").unwrap();
        assert!(set.contains("mer:bob"));
        assert!(!set.contains("mer:carol"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_edge_rejected() {
        let mut set = BeneficiarySet::new();
        set.add("mer:bob").unwrap();
        let result = set.add("mer:bob");
        assert_eq!(result, Err(LedgerError::BeneficiaryExists));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn self_edge_is_permitted() {
        // No rule excludes an account whitelisting itself.
        let mut set = BeneficiarySet::new();
        set.add("mer:alice").unwrap();
        assert!(set.contains("mer:alice"));
    }

    #[test]
    fn empty_set() {
        let set = BeneficiarySet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains("mer:anyone"));
    }
}
