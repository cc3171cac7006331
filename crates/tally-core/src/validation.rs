//! # Validation Module
//!
//! Pure precondition checks for the engine's recorders.
//!
//! ## Validation Strategy
//! Every public operation in tally-db validates its input here *before*
//! opening a transaction, so a `ValidationError` always means nothing was
//! written. The database schema repeats the cheap shape checks (CHECK
//! constraints, NOT NULL) as a second line.

use crate::error::ValidationError;
use crate::types::{
    LedgerEntryKind, NewAccount, NewLedgerEntry, NewStockItem, StockItemPatch, WarehouseKind,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Account Validators
// =============================================================================

/// Validates an account creation request.
///
/// ## Rules
/// - `number` and `name` must be non-empty after trimming
/// - the opening balance must not be negative
pub fn validate_new_account(spec: &NewAccount) -> ValidationResult<()> {
    if spec.number.trim().is_empty() {
        return Err(ValidationError::Required { field: "number" });
    }
    if spec.name.trim().is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    if spec.initial_balance_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "initial_balance_cents",
        });
    }
    Ok(())
}

// =============================================================================
// Ledger Validators
// =============================================================================

/// Validates a ledger entry before posting.
///
/// ## Rules
/// - amount must be strictly positive
/// - `transfer` requires both accounts and they must differ
/// - `payment` requires `from_account` and forbids `to_account`
/// - `receipt` requires `to_account` and forbids `from_account`
pub fn validate_new_entry(entry: &NewLedgerEntry) -> ValidationResult<()> {
    if entry.amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount_cents",
        });
    }
    if entry.operator.trim().is_empty() {
        return Err(ValidationError::Required { field: "operator" });
    }

    match entry.kind {
        LedgerEntryKind::Transfer => {
            let (from, to) = match (&entry.from_account, &entry.to_account) {
                (Some(f), Some(t)) => (f, t),
                (None, _) => {
                    return Err(ValidationError::MissingAccount {
                        kind: "transfer",
                        field: "from_account",
                    })
                }
                (_, None) => {
                    return Err(ValidationError::MissingAccount {
                        kind: "transfer",
                        field: "to_account",
                    })
                }
            };
            if from == to {
                return Err(ValidationError::SameAccount);
            }
        }
        LedgerEntryKind::Payment => {
            if entry.from_account.is_none() {
                return Err(ValidationError::MissingAccount {
                    kind: "payment",
                    field: "from_account",
                });
            }
            if entry.to_account.is_some() {
                return Err(ValidationError::UnexpectedAccount {
                    kind: "payment",
                    field: "to_account",
                });
            }
        }
        LedgerEntryKind::Receipt => {
            if entry.to_account.is_none() {
                return Err(ValidationError::MissingAccount {
                    kind: "receipt",
                    field: "to_account",
                });
            }
            if entry.from_account.is_some() {
                return Err(ValidationError::UnexpectedAccount {
                    kind: "receipt",
                    field: "from_account",
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Stock Validators
// =============================================================================

/// Validates a stock receipt.
///
/// ## Rules
/// - catalog_ref and operator non-empty
/// - quantity and both prices must not be negative
/// - the details variant must match the warehouse family
pub fn validate_new_stock_item(spec: &NewStockItem) -> ValidationResult<()> {
    if spec.catalog_ref.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "catalog_ref",
        });
    }
    if spec.operator.trim().is_empty() {
        return Err(ValidationError::Required { field: "operator" });
    }
    if spec.quantity < 0 {
        return Err(ValidationError::MustNotBeNegative { field: "quantity" });
    }
    if spec.unit_purchase_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_purchase_cents",
        });
    }
    if spec.unit_sale_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_sale_cents",
        });
    }
    if !spec.details.matches(spec.warehouse) {
        let field = if spec.warehouse.is_parts() {
            "appliance details"
        } else {
            "part details"
        };
        return Err(ValidationError::WrongFamily {
            field,
            warehouse: spec.warehouse,
        });
    }
    Ok(())
}

/// Validates a stock patch against the warehouse it targets.
///
/// An empty patch is legal here; the store treats it as a no-op.
pub fn validate_stock_patch(
    warehouse: WarehouseKind,
    patch: &StockItemPatch,
) -> ValidationResult<()> {
    if let Some(q) = patch.quantity {
        if q < 0 {
            return Err(ValidationError::MustNotBeNegative { field: "quantity" });
        }
    }
    if let Some(p) = patch.unit_purchase_cents {
        if p < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "unit_purchase_cents",
            });
        }
    }
    if let Some(p) = patch.unit_sale_cents {
        if p < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "unit_sale_cents",
            });
        }
    }
    if let Some(r) = &patch.catalog_ref {
        if r.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "catalog_ref",
            });
        }
    }

    if warehouse.is_parts() {
        if patch.serial_no.is_some() {
            return Err(ValidationError::WrongFamily {
                field: "serial_no",
                warehouse,
            });
        }
        if patch.source_name.is_some() {
            return Err(ValidationError::WrongFamily {
                field: "source_name",
                warehouse,
            });
        }
    } else {
        if patch.batch_no.is_some() {
            return Err(ValidationError::WrongFamily {
                field: "batch_no",
                warehouse,
            });
        }
        if patch.expiry_date.is_some() {
            return Err(ValidationError::WrongFamily {
                field: "expiry_date",
                warehouse,
            });
        }
    }

    Ok(())
}

/// Validates a consumption quantity. Availability itself is checked by the
/// store inside the transaction.
pub fn validate_consume_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
