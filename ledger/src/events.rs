//! # Ledger Events
//!
//! Every successful state transition appends exactly one tagged record to an
//! append-only log. The log is an audit surface for external observers —
//! it is never consulted for the correctness of subsequent operations.
//! Failed operations append nothing.
//!
//! Variant and field names are part of the observable contract and mirror
//! the event surface existing consumers already parse (yes,
//! `TransferSuccessfull` is spelled that way on purpose).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::AccountStatus;

// ---------------------------------------------------------------------------
// LedgerEvent
// ---------------------------------------------------------------------------

/// A single observable state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum LedgerEvent {
    /// The manager provisioned a new account.
    AccountCreated {
        /// Address of the freshly created account.
        account_address: String,
    },
    /// The manager changed an account's lifecycle status.
    AccountStatusUpdated {
        /// Address whose status changed.
        account_address: String,
        /// The status that was set.
        new_status: AccountStatus,
    },
    /// An owner deposited funds into their own account.
    AmountDeposited {
        /// Address of the depositing account.
        account_address: String,
        /// Deposited amount in smallest units.
        amount: u64,
    },
    /// An owner withdrew funds from their own account.
    AmountWithdrawal {
        /// Address of the withdrawing account.
        account_address: String,
        /// Withdrawn amount in smallest units.
        amount: u64,
    },
    /// An owner whitelisted a transfer counterparty.
    BeneficiaryAdded {
        /// The address that was whitelisted.
        account_added: String,
    },
    /// Funds moved between two accounts.
    TransferSuccessfull {
        /// Debited account.
        from_address: String,
        /// Credited account.
        to_address: String,
        /// Transferred amount in smallest units.
        amount: u64,
    },
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// One entry in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier for this record.
    pub event_id: String,
    /// Position in the log, starting at 0 and strictly increasing.
    pub seq: u64,
    /// Wall-clock time the transition was recorded.
    pub recorded_at: DateTime<Utc>,
    /// The transition itself.
    pub event: LedgerEvent,
}

/// Append-only sequence of [`EventRecord`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends an event, assigning it the next sequence number.
    pub fn record(&mut self, event: LedgerEvent) -> &EventRecord {
        let record = EventRecord {
            event_id: Uuid::new_v4().to_string(),
            seq: self.records.len() as u64,
            recorded_at: Utc::now(),
            event,
        };
        self.records.push(record);
        self.records.last().expect("just pushed")
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the most recent record, if any.
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Iterates over records in append order.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }
}
