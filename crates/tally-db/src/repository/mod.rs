//! # Repository Module
//!
//! The engine components, implemented as repositories over the SQLite pool.
//!
//! ## Control Flow
//! ```text
//! business operation
//!      │
//!      ▼
//! validate preconditions (tally-core, fail closed)
//!      │
//!      ▼
//! mutate owning store ── one transaction per multi-entity effect
//!      │
//!      ▼
//! append audit entry  ── inventory appends are failure-tolerant, the one
//!      │                 soft path; everything else is total-or-nothing
//!      ▼
//! notify observers
//! ```
//!
//! ## Available Repositories
//!
//! - [`account::AccountStore`] - accounts and running balances
//! - [`ledger::LedgerRecorder`] - monetary ledger, balance mutation
//! - [`stock::WarehouseStore`] - per-kind stock tables
//! - [`inventory_log::InventoryLogRecorder`] - append-only stock audit trail
//! - [`deletion::DeletionLog`] - soft/hard delete state machine
//! - [`catalog::CatalogReader`] - read-only catalog lookup

pub mod account;
pub mod catalog;
pub mod deletion;
pub mod inventory_log;
pub mod ledger;
pub mod stock;
