//! # Account Registry
//!
//! The registry owns the mapping from address to [`Account`] record and
//! enforces the existence and status invariants every other component
//! depends on. An account exists from the moment creation succeeds until
//! process termination — there is no deletion operation.
//!
//! Manager authorization is deliberately *not* checked here. The service
//! layer gates who may call create/update; the registry only answers
//! whether the operation is consistent with the records it holds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountStatus};
use crate::error::LedgerError;

/// The address -> account mapping, plus the guards built on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountRegistry {
    accounts: HashMap<String, Account>,
}

impl AccountRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Inserts a fresh account record for `address`.
    ///
    /// The new account is `Active` with a zero balance and no beneficiaries.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountExists`] if a record is already present.
    pub fn create(&mut self, address: &str) -> Result<(), LedgerError> {
        if self.accounts.contains_key(address) {
            return Err(LedgerError::AccountExists);
        }
        self.accounts.insert(address.to_string(), Account::new());
        Ok(())
    }

    /// Sets the status of an existing account.
    ///
    /// Any status may be set at any time — the transition graph is
    /// unconstrained. Setting the current status again is a no-op that
    /// still counts as a successful update.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if `address` has no record.
    pub fn update_status(
        &mut self,
        address: &str,
        status: AccountStatus,
    ) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(address)
            .ok_or(LedgerError::AccountNotFound)?;
        account.status = status;
        account.last_updated = chrono::Utc::now();
        Ok(())
    }

    /// Returns the account record, failing if none exists.
    ///
    /// Used where "doesn't exist" must be distinguished from "exists but
    /// inactive" — the existence check always precedes the active check.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if `address` has no record.
    pub fn require_exists(&self, address: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(address)
            .ok_or(LedgerError::AccountNotFound)
    }

    /// Returns the account record, failing unless it exists *and* is
    /// `Active`. Precondition guard for every caller-scoped read or
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if `address` has no record,
    /// [`LedgerError::AccountNotActive`] if the record is not `Active`.
    pub fn require_active(&self, address: &str) -> Result<&Account, LedgerError> {
        let account = self.require_exists(address)?;
        if !account.is_active() {
            return Err(LedgerError::AccountNotActive);
        }
        Ok(account)
    }

    /// Retrieves an account record, or `None` if absent.
    pub fn get(&self, address: &str) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Retrieves a mutable account record, or `None` if absent.
    pub fn get_mut(&mut self, address: &str) -> Option<&mut Account> {
        self.accounts.get_mut(address)
    }

    /// Returns the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` if no account has been created.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Total value custodied by the ledger: the sum of every balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] if the sum exceeds
    /// `u64::MAX`.
    pub fn total_balance(&self) -> Result<u64, LedgerError> {
        self.accounts.values().try_fold(0u64, |total, account| {
            total
                .checked_add(account.balance)
                .ok_or(LedgerError::BalanceOverflow)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
