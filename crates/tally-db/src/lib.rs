//! # tally-db: Database Layer for the Tally Engine
//!
//! This crate provides persistence for the Tally ledger & inventory engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                               │
//! │                                                                      │
//! │  Business operation ("receive a batch", "pay a supplier")            │
//! │       │                                                              │
//! │       ▼                                                              │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                    tally-db (THIS CRATE)                      │  │
//! │  │                                                               │  │
//! │  │   ┌─────────────┐   ┌────────────────┐   ┌────────────────┐  │  │
//! │  │   │  Database   │   │  Repositories  │   │   Migrations   │  │  │
//! │  │   │  (pool.rs)  │◄──│  account.rs    │   │   (embedded)   │  │  │
//! │  │   │             │   │  ledger.rs     │   │ 001_initial_   │  │  │
//! │  │   │ SqlitePool  │   │  stock.rs ...  │   │   schema.sql   │  │  │
//! │  │   └─────────────┘   └────────────────┘   └────────────────┘  │  │
//! │  │                                                               │  │
//! │  │   validates → mutates in one transaction → appends audit      │  │
//! │  │   entry → notifies observers                                  │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                              │
//! │       ▼                                                              │
//! │  SQLite database (WAL, foreign keys on)                              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`notifier`] - Broadcast-channel change notifier
//! - [`repository`] - The engine components (stores, recorders, audit log)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tally.db")).await?;
//!
//! let account = db.accounts().create(new_account).await?;
//! let entry = db.ledger().record(new_entry).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod notifier;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use notifier::BroadcastNotifier;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::AccountStore;
pub use repository::catalog::CatalogReader;
pub use repository::deletion::DeletionLog;
pub use repository::inventory_log::InventoryLogRecorder;
pub use repository::ledger::LedgerRecorder;
pub use repository::stock::WarehouseStore;
