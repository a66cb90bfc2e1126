//! # Bank Service
//!
//! The top-level composition. Every external call enters here: the service
//! consults [`AccessControl`] for manager-restricted operations or the
//! [`AccountRegistry`] guards for owner-restricted ones, delegates the
//! mutation, and records one [`LedgerEvent`] per successful transition.
//!
//! ## Atomicity
//!
//! The original platform serialized every call and committed it fully or
//! not at all. A single `parking_lot::RwLock` around the mutable state
//! reintroduces that guarantee: each operation acquires the lock once,
//! validates *every* precondition, and only then mutates. A failed
//! operation therefore leaves state byte-for-byte unchanged and emits
//! nothing. The immutable manager identity lives outside the lock.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::AccessControl;
use crate::account::AccountStatus;
use crate::error::LedgerError;
use crate::events::{EventLog, EventRecord, LedgerEvent};
use crate::registry::AccountRegistry;

/// Mutable ledger state guarded by the service lock.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BankState {
    registry: AccountRegistry,
    events: EventLog,
}

/// The permissioned ledger service.
///
/// One instance owns the whole ledger: the manager identity, the account
/// registry, and the audit log. `Bank` is `Send + Sync`; share it across
/// threads with `Arc` — every operation remains atomic.
#[derive(Debug)]
pub struct Bank {
    access: AccessControl,
    state: RwLock<BankState>,
}

impl Bank {
    /// Creates an empty ledger with `manager` as the single administrative
    /// identity. The manager is fixed for the life of the instance.
    pub fn new(manager: impl Into<String>) -> Self {
        let access = AccessControl::new(manager);
        info!(manager = %access.manager(), "bank initialized");
        Self {
            access,
            state: RwLock::new(BankState::default()),
        }
    }

    /// Returns the manager address. Callable by anyone.
    pub fn manager(&self) -> String {
        self.access.manager().to_string()
    }

    // -----------------------------------------------------------------------
    // Manager operations
    // -----------------------------------------------------------------------

    /// Provisions a new account for `address`. Manager only.
    ///
    /// The account starts `Active` with a zero balance and no beneficiaries.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unauthorized`] unless `caller` is the manager,
    /// [`LedgerError::AccountExists`] if `address` already has a record.
    pub fn create_account(&self, caller: &str, address: &str) -> Result<(), LedgerError> {
        self.access.require_manager(caller)?;

        let mut state = self.state.write();
        state.registry.create(address)?;
        state.events.record(LedgerEvent::AccountCreated {
            account_address: address.to_string(),
        });
        info!(account = %address, "account created");
        Ok(())
    }

    /// Sets the lifecycle status of an existing account. Manager only.
    ///
    /// Any status may be set at any time; there are no transition rules.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unauthorized`] unless `caller` is the manager,
    /// [`LedgerError::AccountNotFound`] if `address` has no record.
    pub fn update_account_status(
        &self,
        caller: &str,
        address: &str,
        status: AccountStatus,
    ) -> Result<(), LedgerError> {
        self.access.require_manager(caller)?;

        let mut state = self.state.write();
        state.registry.update_status(address, status)?;
        state.events.record(LedgerEvent::AccountStatusUpdated {
            account_address: address.to_string(),
            new_status: status,
        });
        info!(account = %address, %status, "account status updated");
        Ok(())
    }

    /// Total value custodied by the ledger — the sum of every account
    /// balance, not any single one. Manager only.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unauthorized`] unless `caller` is the manager.
    pub fn bank_balance(&self, caller: &str) -> Result<u64, LedgerError> {
        self.access.require_manager(caller)?;
        self.state.read().registry.total_balance()
    }

    // -----------------------------------------------------------------------
    // Public reads
    // -----------------------------------------------------------------------

    /// Returns the lifecycle status of `address`. Callable by anyone.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if `address` has no record.
    pub fn account_status(&self, address: &str) -> Result<AccountStatus, LedgerError> {
        Ok(self.state.read().registry.require_exists(address)?.status)
    }

    // -----------------------------------------------------------------------
    // Owner operations
    // -----------------------------------------------------------------------

    /// Returns the caller's own balance. No cross-account reads.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] /
    /// [`LedgerError::AccountNotActive`] unless the caller's account exists
    /// and is `Active`.
    pub fn get_balance(&self, caller: &str) -> Result<u64, LedgerError> {
        Ok(self.state.read().registry.require_active(caller)?.balance)
    }

    /// Deposits `amount` into the caller's account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAmount`] if `amount` is zero,
    /// [`LedgerError::BalanceOverflow`] if the credit would overflow, plus
    /// the existence/active guards on the caller.
    pub fn deposit(&self, caller: &str, amount: u64) -> Result<u64, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let mut state = self.state.write();
        state.registry.require_active(caller)?;

        let account = state.registry.get_mut(caller).expect("guard passed");
        let balance = account.credit(amount)?;

        state.events.record(LedgerEvent::AmountDeposited {
            account_address: caller.to_string(),
            amount,
        });
        info!(account = %caller, amount, balance, "deposit");
        Ok(balance)
    }

    /// Withdraws `amount` from the caller's account, releasing it to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if `amount` exceeds the
    /// balance, plus the existence/active guards on the caller.
    pub fn withdraw(&self, caller: &str, amount: u64) -> Result<u64, LedgerError> {
        let mut state = self.state.write();
        state.registry.require_active(caller)?;

        let account = state.registry.get_mut(caller).expect("guard passed");
        let balance = account.debit(amount)?;

        state.events.record(LedgerEvent::AmountWithdrawal {
            account_address: caller.to_string(),
            amount,
        });
        info!(account = %caller, amount, balance, "withdrawal");
        Ok(balance)
    }

    /// Whitelists `target` as a transfer counterparty for the caller.
    ///
    /// `target` must exist and be `Active` at add time; its liveness is
    /// re-validated again on every transfer. Self-whitelisting is permitted.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if `target` has no record,
    /// [`LedgerError::AccountNotActive`] if `target` is not `Active`,
    /// [`LedgerError::BeneficiaryExists`] on a duplicate edge, plus the
    /// existence/active guards on the caller.
    pub fn add_beneficiary(&self, caller: &str, target: &str) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        state.registry.require_active(caller)?;
        // Existence is reported before inactivity for the target, same as
        // everywhere else.
        state.registry.require_active(target)?;

        let owner = state.registry.get_mut(caller).expect("guard passed");
        owner.beneficiaries.add(target)?;

        state.events.record(LedgerEvent::BeneficiaryAdded {
            account_added: target.to_string(),
        });
        info!(account = %caller, beneficiary = %target, "beneficiary added");
        Ok(())
    }

    /// Moves `amount` from the caller to `to`.
    ///
    /// `to` must be in the caller's beneficiary set *and* currently
    /// `Active` — the whitelist does not bypass the liveness check. Both
    /// sides are validated before either balance is touched, so the sum of
    /// the two balances is invariant across the call and a failure mutates
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] if `to` has no record,
    /// [`LedgerError::AccountNotActive`] if `to` is not a whitelisted
    /// active counterparty, [`LedgerError::InsufficientFunds`] if `amount`
    /// exceeds the caller's balance, plus the guards on the caller.
    pub fn transfer(&self, caller: &str, to: &str, amount: u64) -> Result<(), LedgerError> {
        let mut state = self.state.write();

        let sender = state.registry.require_active(caller)?;
        let sender_balance = sender.balance;
        let whitelisted = sender.beneficiaries.contains(to);

        let recipient = state.registry.require_exists(to)?;
        if !whitelisted || !recipient.is_active() {
            return Err(LedgerError::AccountNotActive);
        }
        if amount > sender_balance {
            return Err(LedgerError::InsufficientFunds);
        }
        // Validate the credit side before mutating anything. A self-transfer
        // nets to zero, so the aliased account is exempt from this check.
        if caller != to {
            recipient
                .balance
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?;
        }

        state
            .registry
            .get_mut(caller)
            .expect("guard passed")
            .debit(amount)?;
        state
            .registry
            .get_mut(to)
            .expect("guard passed")
            .credit(amount)?;

        state.events.record(LedgerEvent::TransferSuccessfull {
            from_address: caller.to_string(),
            to_address: to.to_string(),
            amount,
        });
        info!(from = %caller, %to, amount, "transfer");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Audit surface
    // -----------------------------------------------------------------------

    /// Snapshot of the audit log, in append order.
    pub fn events(&self) -> Vec<EventRecord> {
        self.state.read().events.iter().cloned().collect()
    }

    /// Number of recorded events.
    pub fn event_count(&self) -> usize {
        self.state.read().events.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MANAGER: &str = "mer:manager";

    fn bank_with_account(address: &str) -> Bank {
        let bank = Bank::new(MANAGER);
        bank.create_account(MANAGER, address).unwrap();
        bank
    }

    #[test]
    fn manager_is_readable_by_anyone() {
        let bank = Bank::new(MANAGER);
        assert_eq!(bank.manager(), MANAGER);
    }

    #[test]
    fn only_manager_creates_accounts() {
        let bank = Bank::new(MANAGER);
        assert_eq!(
            bank.create_account("mer:alice", "mer:alice"),
            Err(LedgerError::Unauthorized)
        );
        bank.create_account(MANAGER, "mer:alice").unwrap();
    }

    #[test]
    fn duplicate_account_rejected() {
        let bank = bank_with_account("mer:alice");
        assert_eq!(
            bank.create_account(MANAGER, "mer:alice"),
            Err(LedgerError::AccountExists)
        );
    }

    #[test]
    fn fresh_account_is_active_with_zero_balance() {
        let bank = bank_with_account("mer:alice");
        assert_eq!(
            bank.account_status("mer:alice").unwrap(),
            AccountStatus::Active
        );
        assert_eq!(bank.get_balance("mer:alice").unwrap(), 0);
    }

    #[test]
    fn only_manager_updates_status() {
        let bank = bank_with_account("mer:alice");
        assert_eq!(
            bank.update_account_status("mer:alice", "mer:alice", AccountStatus::Inactive),
            Err(LedgerError::Unauthorized)
        );
        bank.update_account_status(MANAGER, "mer:alice", AccountStatus::Inactive)
            .unwrap();
        assert_eq!(
            bank.account_status("mer:alice").unwrap(),
            AccountStatus::Inactive
        );
    }

    #[test]
    fn inactive_account_blocks_owner_operations() {
        let bank = bank_with_account("mer:alice");
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.deposit("mer:alice", 10).unwrap();
        bank.update_account_status(MANAGER, "mer:alice", AccountStatus::Inactive)
            .unwrap();

        assert_eq!(
            bank.get_balance("mer:alice"),
            Err(LedgerError::AccountNotActive)
        );
        assert_eq!(
            bank.deposit("mer:alice", 1),
            Err(LedgerError::AccountNotActive)
        );
        assert_eq!(
            bank.withdraw("mer:alice", 1),
            Err(LedgerError::AccountNotActive)
        );
        assert_eq!(
            bank.add_beneficiary("mer:alice", "mer:bob"),
            Err(LedgerError::AccountNotActive)
        );
        assert_eq!(
            bank.transfer("mer:alice", "mer:bob", 1),
            Err(LedgerError::AccountNotActive)
        );
    }

    #[test]
    fn zero_deposit_rejected() {
        let bank = bank_with_account("mer:alice");
        assert_eq!(
            bank.deposit("mer:alice", 0),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(bank.event_count(), 1); // only AccountCreated
    }

    #[test]
    fn deposit_withdraw_round_trip() {
        let bank = bank_with_account("mer:alice");
        bank.deposit("mer:alice", 250).unwrap();
        bank.withdraw("mer:alice", 250).unwrap();
        assert_eq!(bank.get_balance("mer:alice").unwrap(), 0);
    }

    #[test]
    fn overdraft_rejected_without_mutation() {
        let bank = bank_with_account("mer:alice");
        bank.deposit("mer:alice", 5).unwrap();
        let events_before = bank.event_count();

        assert_eq!(
            bank.withdraw("mer:alice", 6),
            Err(LedgerError::InsufficientFunds)
        );
        assert_eq!(bank.get_balance("mer:alice").unwrap(), 5);
        assert_eq!(bank.event_count(), events_before);
    }

    #[test]
    fn beneficiary_must_exist_and_be_active() {
        let bank = bank_with_account("mer:alice");
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.update_account_status(MANAGER, "mer:bob", AccountStatus::Suspended)
            .unwrap();

        assert_eq!(
            bank.add_beneficiary("mer:alice", "mer:ghost"),
            Err(LedgerError::AccountNotFound)
        );
        assert_eq!(
            bank.add_beneficiary("mer:alice", "mer:bob"),
            Err(LedgerError::AccountNotActive)
        );
    }

    #[test]
    fn duplicate_beneficiary_rejected() {
        let bank = bank_with_account("mer:alice");
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.add_beneficiary("mer:alice", "mer:bob").unwrap();
        assert_eq!(
            bank.add_beneficiary("mer:alice", "mer:bob"),
            Err(LedgerError::BeneficiaryExists)
        );
    }

    #[test]
    fn transfer_requires_whitelisted_active_recipient() {
        let bank = bank_with_account("mer:alice");
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.deposit("mer:alice", 100).unwrap();

        // Existing, active, but not whitelisted.
        assert_eq!(
            bank.transfer("mer:alice", "mer:bob", 1),
            Err(LedgerError::AccountNotActive)
        );

        // No record at all.
        assert_eq!(
            bank.transfer("mer:alice", "mer:ghost", 1),
            Err(LedgerError::AccountNotFound)
        );

        bank.add_beneficiary("mer:alice", "mer:bob").unwrap();
        bank.transfer("mer:alice", "mer:bob", 1).unwrap();

        // Whitelisted but later suspended: liveness is re-checked.
        bank.update_account_status(MANAGER, "mer:bob", AccountStatus::Suspended)
            .unwrap();
        assert_eq!(
            bank.transfer("mer:alice", "mer:bob", 1),
            Err(LedgerError::AccountNotActive)
        );
    }

    #[test]
    fn transfer_preserves_total_balance() {
        let bank = bank_with_account("mer:alice");
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.deposit("mer:alice", 100).unwrap();
        bank.deposit("mer:bob", 40).unwrap();
        bank.add_beneficiary("mer:alice", "mer:bob").unwrap();

        bank.transfer("mer:alice", "mer:bob", 30).unwrap();

        assert_eq!(bank.get_balance("mer:alice").unwrap(), 70);
        assert_eq!(bank.get_balance("mer:bob").unwrap(), 70);
        assert_eq!(bank.bank_balance(MANAGER).unwrap(), 140);
    }

    #[test]
    fn failed_transfer_mutates_nothing() {
        let bank = bank_with_account("mer:alice");
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.deposit("mer:alice", 10).unwrap();
        bank.add_beneficiary("mer:alice", "mer:bob").unwrap();
        let events_before = bank.event_count();

        assert_eq!(
            bank.transfer("mer:alice", "mer:bob", 11),
            Err(LedgerError::InsufficientFunds)
        );
        assert_eq!(bank.get_balance("mer:alice").unwrap(), 10);
        assert_eq!(bank.get_balance("mer:bob").unwrap(), 0);
        assert_eq!(bank.event_count(), events_before);
    }

    #[test]
    fn self_transfer_is_permitted_and_nets_zero() {
        let bank = bank_with_account("mer:alice");
        bank.deposit("mer:alice", 50).unwrap();
        bank.add_beneficiary("mer:alice", "mer:alice").unwrap();

        bank.transfer("mer:alice", "mer:alice", 20).unwrap();
        assert_eq!(bank.get_balance("mer:alice").unwrap(), 50);
    }

    #[test]
    fn self_transfer_at_max_balance_succeeds() {
        // Debit-then-credit on the aliased account nets to zero, so a full
        // balance must not trip the recipient overflow guard.
        let bank = bank_with_account("mer:alice");
        bank.deposit("mer:alice", u64::MAX).unwrap();
        bank.add_beneficiary("mer:alice", "mer:alice").unwrap();

        bank.transfer("mer:alice", "mer:alice", 1).unwrap();
        bank.transfer("mer:alice", "mer:alice", u64::MAX).unwrap();
        assert_eq!(bank.get_balance("mer:alice").unwrap(), u64::MAX);
    }

    #[test]
    fn transfer_overflowing_recipient_rejected_without_mutation() {
        let bank = bank_with_account("mer:alice");
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.deposit("mer:alice", 10).unwrap();
        bank.deposit("mer:bob", u64::MAX).unwrap();
        bank.add_beneficiary("mer:alice", "mer:bob").unwrap();
        let events_before = bank.event_count();

        assert_eq!(
            bank.transfer("mer:alice", "mer:bob", 1),
            Err(LedgerError::BalanceOverflow)
        );
        assert_eq!(bank.get_balance("mer:alice").unwrap(), 10);
        assert_eq!(bank.get_balance("mer:bob").unwrap(), u64::MAX);
        assert_eq!(bank.event_count(), events_before);
    }

    #[test]
    fn only_manager_reads_bank_balance() {
        let bank = bank_with_account("mer:alice");
        bank.deposit("mer:alice", 5).unwrap();

        assert_eq!(
            bank.bank_balance("mer:alice"),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(bank.bank_balance(MANAGER).unwrap(), 5);
    }

    #[test]
    fn deposit_overflow_leaves_balance_unchanged() {
        let bank = bank_with_account("mer:alice");
        bank.deposit("mer:alice", u64::MAX).unwrap();
        assert_eq!(
            bank.deposit("mer:alice", 1),
            Err(LedgerError::BalanceOverflow)
        );
        assert_eq!(bank.get_balance("mer:alice").unwrap(), u64::MAX);
    }

    #[test]
    fn every_mutation_appends_exactly_one_event() {
        let bank = Bank::new(MANAGER);
        bank.create_account(MANAGER, "mer:alice").unwrap();
        bank.create_account(MANAGER, "mer:bob").unwrap();
        bank.deposit("mer:alice", 10).unwrap();
        bank.withdraw("mer:alice", 2).unwrap();
        bank.add_beneficiary("mer:alice", "mer:bob").unwrap();
        bank.transfer("mer:alice", "mer:bob", 3).unwrap();
        bank.update_account_status(MANAGER, "mer:bob", AccountStatus::Suspended)
            .unwrap();

        let events = bank.events();
        assert_eq!(events.len(), 7);
        let seqs: Vec<u64> = events.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, (0..7).collect::<Vec<u64>>());
        assert_eq!(
            events[5].event,
            LedgerEvent::TransferSuccessfull {
                from_address: "mer:alice".into(),
                to_address: "mer:bob".into(),
                amount: 3,
            }
        );
    }
}
