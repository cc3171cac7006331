//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                  │
//! │                                                                      │
//! │  tally-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                     │
//! │  └── ValidationError  - Input validation failures                    │
//! │                                                                      │
//! │  tally-db errors (separate crate)                                    │
//! │  └── DbError          - Persistence failures, wraps CoreError        │
//! │                                                                      │
//! │  Flow: ValidationError → CoreError → DbError → caller                │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (account id, balance, amount)
//! 3. Errors are enum variants, never String
//! 4. Validation and business-rule errors are raised before any mutation

use thiserror::Error;

use crate::types::{StockStatus, WarehouseKind};

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// These are raised by the recorders before anything is written; a caller
/// receiving one can be sure no state changed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A debit would drive the account balance negative. No overdraft is
    /// ever permitted.
    #[error("insufficient funds on account {account}: balance {balance_cents}, requested {requested_cents}")]
    InsufficientFunds {
        account: String,
        balance_cents: i64,
        requested_cents: i64,
    },

    /// The account exists but was deactivated; history stays readable but
    /// new entries may not reference it.
    #[error("account {0} is inactive")]
    AccountInactive(String),

    /// Not enough stock on hand to consume.
    #[error("insufficient stock on {warehouse} item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        warehouse: WarehouseKind,
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// The item's current status does not allow the requested transition.
    #[error("{warehouse} item {item_id} is {status:?}, cannot {operation}")]
    InvalidStatusChange {
        warehouse: WarehouseKind,
        item_id: String,
        status: StockStatus,
        operation: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when the shape of the input is wrong, before business rules
/// are even consulted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: &'static str },

    /// The entry kind requires an account that was not supplied.
    #[error("{kind} entries require {field}")]
    MissingAccount {
        kind: &'static str,
        field: &'static str,
    },

    /// The entry kind forbids an account that was supplied.
    #[error("{kind} entries do not take {field}")]
    UnexpectedAccount {
        kind: &'static str,
        field: &'static str,
    },

    /// A transfer must move money between two distinct accounts.
    #[error("transfer requires two distinct accounts")]
    SameAccount,

    /// Stock details (or patch fields) from the wrong warehouse family.
    #[error("{field} does not apply to {warehouse} items")]
    WrongFamily {
        field: &'static str,
        warehouse: WarehouseKind,
    },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
