//! # Account Records
//!
//! An [`Account`] is the unit of state in the ledger: a balance in the
//! smallest currency unit, a lifecycle [`AccountStatus`], and the set of
//! beneficiary addresses the owner may transfer to. Accounts are created by
//! the manager, start `Active` with a zero balance, and are never deleted —
//! status transitions are the only lifecycle mutation after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::beneficiary::BeneficiarySet;
use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// AccountStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of an account.
///
/// The numeric codes are observable through the status query operation and
/// the event surface, and are therefore fixed: `Inactive = 0`,
/// `Active = 1`, `Suspended = 2`. Serialization uses the code, not the
/// variant name, to match what existing consumers parse. The manager may
/// set any status on any existing account at any time — there is no
/// transition adjacency rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum AccountStatus {
    /// All owner operations are blocked.
    Inactive = 0,
    /// Full operational rights.
    Active = 1,
    /// Blocking, distinct code used for counterparties already engaged
    /// as beneficiaries.
    Suspended = 2,
}

impl AccountStatus {
    /// Returns the wire/display code for this status.
    pub fn as_code(self) -> u8 {
        self as u8
    }

    /// Parses a status code. Returns `None` for anything outside 0..=2.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AccountStatus::Inactive),
            1 => Some(AccountStatus::Active),
            2 => Some(AccountStatus::Suspended),
            _ => None,
        }
    }
}

impl From<AccountStatus> for u8 {
    fn from(status: AccountStatus) -> u8 {
        status.as_code()
    }
}

impl TryFrom<u8> for AccountStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        AccountStatus::from_code(code).ok_or_else(|| format!("unknown account status code {code}"))
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Inactive => write!(f, "Inactive"),
            AccountStatus::Active => write!(f, "Active"),
            AccountStatus::Suspended => write!(f, "Suspended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A single ledger account.
///
/// The balance is a plaintext `u64` in the smallest currency unit. Every
/// balance mutation goes through [`credit`](Self::credit) or
/// [`debit`](Self::debit), which enforce overflow protection and the
/// non-negative-balance invariant respectively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Balance in smallest units. Never negative by construction.
    pub balance: u64,
    /// Current lifecycle status.
    pub status: AccountStatus,
    /// Addresses this account may transfer to.
    pub beneficiaries: BeneficiarySet,
    /// Timestamp when the account was created.
    pub opened_at: DateTime<Utc>,
    /// Timestamp of the most recent balance or status change.
    pub last_updated: DateTime<Utc>,
}

impl Account {
    /// Creates a fresh account: `Active`, zero balance, no beneficiaries.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            balance: 0,
            status: AccountStatus::Active,
            beneficiaries: BeneficiarySet::new(),
            opened_at: now,
            last_updated: now,
        }
    }

    /// Returns `true` if the account is in `Active` status.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Adds funds to the balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] if the credit would exceed
    /// `u64::MAX`.
    pub fn credit(&mut self, amount: u64) -> Result<u64, LedgerError> {
        let new_balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.balance = new_balance;
        self.last_updated = Utc::now();
        Ok(new_balance)
    }

    /// Removes funds from the balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if `amount` exceeds the
    /// current balance. The balance is left untouched on failure.
    pub fn debit(&mut self, amount: u64) -> Result<u64, LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance -= amount;
        self.last_updated = Utc::now();
        Ok(self.balance)
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
