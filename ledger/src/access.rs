//! # Access Control
//!
//! The ledger has exactly one privileged identity: the manager, bound once
//! at construction and never reassignable. Manager-only operations (account
//! provisioning, status changes, aggregate balance reads) call
//! [`AccessControl::require_manager`] before touching any state.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Gate for manager-only operations.
///
/// A pure predicate over the immutable manager identity — no side effects,
/// no state beyond the address captured at initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControl {
    manager: String,
}

impl AccessControl {
    /// Captures the manager identity. There is no way to change it later.
    pub fn new(manager: impl Into<String>) -> Self {
        Self {
            manager: manager.into(),
        }
    }

    /// Returns the manager address. Readable by anyone.
    pub fn manager(&self) -> &str {
        &self.manager
    }

    /// Returns `true` if `caller` is the manager.
    pub fn is_manager(&self, caller: &str) -> bool {
        caller == self.manager
    }

    /// Fails unless `caller` is the manager.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unauthorized`] for any other caller.
    pub fn require_manager(&self, caller: &str) -> Result<(), LedgerError> {
        if !self.is_manager(caller) {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }
}
