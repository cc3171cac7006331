//! # tally-core: Pure Business Logic for the Tally Engine
//!
//! This crate is the **heart** of the Tally ledger & inventory engine. It
//! contains the domain types, monetary invariants and validation rules as
//! pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                            │
//! │                                                                      │
//! │  UI / Reports / SMS dispatch (external collaborators)                │
//! │       │                 ▲                                            │
//! │       │ calls           │ change notifications                       │
//! │       ▼                 │                                            │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                 tally-db (stores & recorders)                 │  │
//! │  │   AccountStore · LedgerRecorder · WarehouseStore              │  │
//! │  │   InventoryLogRecorder · DeletionLog                          │  │
//! │  └───────────────────────────────┬───────────────────────────────┘  │
//! │                                  │                                   │
//! │  ┌───────────────────────────────▼───────────────────────────────┐  │
//! │  │               ★ tally-core (THIS CRATE) ★                     │  │
//! │  │                                                               │  │
//! │  │   ┌─────────┐  ┌─────────┐  ┌────────────┐  ┌────────────┐   │  │
//! │  │   │  types  │  │  money  │  │ validation │  │   notify   │   │  │
//! │  │   └─────────┘  └─────────┘  └────────────┘  └────────────┘   │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Account, LedgerEntry, StockItem, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`notify`] - Change-notification interface for external observers
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor currency units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod notify;
pub mod types;
pub mod validation;

// Re-exports for convenience: `use tally_core::Money` instead of
// `use tally_core::money::Money`.

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use notify::{ChangeNotifier, EntityKind, NullNotifier};
pub use types::*;
