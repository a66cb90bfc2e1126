//! # Meridian Ledger — Core Library
//!
//! A permissioned, in-memory ledger: a single manager provisions accounts
//! and controls their lifecycle; account holders deposit, withdraw, and
//! transfer funds to a per-account whitelist of beneficiary counterparties.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of the
//! ledger:
//!
//! - **access** — the manager-identity gate. One privileged address, bound
//!   at construction, never reassignable.
//! - **account** — account records and the lifecycle status enum.
//! - **beneficiary** — the directed transfer whitelist each account owns.
//! - **registry** — the address → account mapping and its existence/status
//!   guards.
//! - **events** — the append-only audit log, one record per successful
//!   state transition.
//! - **service** — [`Bank`](service::Bank), the composition that exposes
//!   the full operation surface behind a single write lock.
//! - **error** — the error taxonomy. One variant per failure mode, display
//!   strings frozen for compatibility.
//!
//! ## Design Philosophy
//!
//! 1. Every precondition is checked before anything mutates — a failed
//!    operation leaves the ledger byte-for-byte unchanged.
//! 2. Checked arithmetic on every monetary operation. If it touches money,
//!    it has tests. Plural.
//! 3. No ambient globals: the whole ledger is one owned [`service::Bank`]
//!    value you pass around.

pub mod access;
pub mod account;
pub mod beneficiary;
pub mod error;
pub mod events;
pub mod registry;
pub mod service;

pub use account::AccountStatus;
pub use error::LedgerError;
pub use service::Bank;
