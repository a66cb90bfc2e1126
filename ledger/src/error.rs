//! # Error Taxonomy
//!
//! Every failure mode in the ledger maps to exactly one variant here. The
//! display strings are part of the observable contract: existing consumers
//! match on them verbatim, misspellings included, so they must never be
//! reworded. If a string in this file offends you, it offends us too.

use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Every precondition failure aborts the entire operation with no partial
/// mutation and no event emission. The caller receives the specific error
/// kind; nothing is retried or silently swallowed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller is not the bank manager.
    #[error("Only bank manaker can access this functionality")]
    Unauthorized,

    /// An account record already exists for this address.
    #[error("It seems account already exists")]
    AccountExists,

    /// The referenced address has no account record.
    #[error("It seems account doesnot exists")]
    AccountNotFound,

    /// The referenced account exists but is not in `Active` status.
    #[error("It seems account is not active")]
    AccountNotActive,

    /// The requested amount exceeds the available balance.
    #[error("Don't have enough balance to make this transaction")]
    InsufficientFunds,

    /// The beneficiary edge is already present for this owner.
    #[error("Beneficiary already exists")]
    BeneficiaryExists,

    /// A deposit of zero units. Deposits must carry value.
    #[error("Amount should be greater than 0")]
    InvalidAmount,

    /// A credit would overflow `u64`. Wrapping arithmetic and money do not
    /// mix, so every monetary operation is checked.
    #[error("Balance overflow: ledger cannot hold this amount")]
    BalanceOverflow,
}
