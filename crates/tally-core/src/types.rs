//! # Domain Types
//!
//! Core domain types for the Tally ledger & inventory engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                 │
//! │                                                                      │
//! │  ┌───────────────┐   ┌────────────────┐   ┌────────────────────┐    │
//! │  │    Account    │   │  LedgerEntry   │   │     StockItem      │    │
//! │  │  ───────────  │   │  ────────────  │   │  ────────────────  │    │
//! │  │  id (UUID)    │   │  id (UUID)     │   │  id (UUID)         │    │
//! │  │  number       │   │  kind          │   │  warehouse kind    │    │
//! │  │  balances     │   │  from/to       │   │  quantity, status  │    │
//! │  │  is_active    │   │  amount_cents  │   │  StockDetails      │    │
//! │  └───────────────┘   └────────────────┘   └────────────────────┘    │
//! │                                                                      │
//! │  ┌────────────────┐   ┌────────────────┐   ┌──────────────────┐     │
//! │  │ InventoryEntry │   │ DeletionRecord │   │  WarehouseKind   │     │
//! │  │  append-only   │   │  soft | hard   │   │  4 closed kinds  │     │
//! │  └────────────────┘   └────────────────┘   └──────────────────┘     │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: (account number, catalog ref, serial no) - human-readable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Accounts
// =============================================================================

/// High-level account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Checking / current account at an institution.
    Current,
    /// Physical cash drawer or petty cash.
    Cash,
    /// Savings account.
    Savings,
    /// Anything else (prepaid cards, wallets, ...).
    Other,
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Current
    }
}

/// A monetary account with a tracked running balance.
///
/// Accounts are never physically deleted - only deactivated - because
/// historical ledger entries must remain attributable.
///
/// Invariant at rest:
/// `current_balance_cents == initial_balance_cents + sum(credits) - sum(debits)`
/// over all ledger entries referencing the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Account number - business identifier, unique.
    pub number: String,

    /// Display name shown to the operator.
    pub name: String,

    /// Account classification.
    pub account_type: AccountType,

    /// Institution (bank) holding the account, if any.
    pub institution: Option<String>,

    /// Person the account belongs to.
    pub owner: Option<String>,

    /// Opening balance in minor units. Fixed at creation.
    pub initial_balance_cents: i64,

    /// Running balance in minor units. Mutated only by the ledger recorder.
    pub current_balance_cents: i64,

    /// Whether the account accepts new entries (soft delete flag).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns the current balance as Money.
    #[inline]
    pub fn current_balance(&self) -> Money {
        Money::from_cents(self.current_balance_cents)
    }

    /// Returns the opening balance as Money.
    #[inline]
    pub fn initial_balance(&self) -> Money {
        Money::from_cents(self.initial_balance_cents)
    }
}

/// Input for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub number: String,
    pub name: String,
    pub account_type: AccountType,
    pub institution: Option<String>,
    pub owner: Option<String>,
    /// Opening balance in minor units, must be >= 0.
    pub initial_balance_cents: i64,
}

/// Partial update for account metadata. Balances are not patchable; they
/// change only through posted ledger entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub institution: Option<String>,
    pub owner: Option<String>,
}

impl AccountPatch {
    /// True when no field is set; such a patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.institution.is_none() && self.owner.is_none()
    }
}

// =============================================================================
// Ledger Entries
// =============================================================================

/// The kind of monetary movement a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    /// Money moved between two tracked accounts.
    Transfer,
    /// Money entering a tracked account from outside.
    Receipt,
    /// Money leaving a tracked account to outside.
    Payment,
}

impl LedgerEntryKind {
    /// The kind a reversal entry takes when the accounts are swapped.
    /// A payment reversed is money coming back in; a receipt reversed is
    /// money going back out; a transfer reversed stays a transfer.
    pub fn reversed(&self) -> LedgerEntryKind {
        match self {
            LedgerEntryKind::Transfer => LedgerEntryKind::Transfer,
            LedgerEntryKind::Receipt => LedgerEntryKind::Payment,
            LedgerEntryKind::Payment => LedgerEntryKind::Receipt,
        }
    }
}

/// An immutable record of a monetary movement between zero, one, or two
/// accounts. Append-only: the only way to undo an entry is to post a new
/// one with the accounts swapped (see `LedgerRecorder::reverse`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: String,
    pub kind: LedgerEntryKind,
    /// Debited account, when the kind debits one.
    pub from_account: Option<String>,
    /// Credited account, when the kind credits one.
    pub to_account: Option<String>,
    /// Positive amount in minor units.
    pub amount_cents: i64,
    pub description: Option<String>,
    /// Who posted the entry.
    pub operator: String,
    pub occurred_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Input for posting a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub kind: LedgerEntryKind,
    pub from_account: Option<String>,
    pub to_account: Option<String>,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub operator: String,
}

/// Read filter for ledger entries.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    /// Match entries debiting or crediting this account.
    pub account: Option<String>,
    pub kind: Option<LedgerEntryKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// =============================================================================
// Warehouses
// =============================================================================

/// The four physically distinct warehouses. Each kind owns its own table;
/// the composite stock-item key is (warehouse kind, item id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum WarehouseKind {
    NewParts,
    UsedParts,
    NewAppliances,
    UsedAppliances,
}

impl WarehouseKind {
    /// All kinds, in a stable order.
    pub const ALL: [WarehouseKind; 4] = [
        WarehouseKind::NewParts,
        WarehouseKind::UsedParts,
        WarehouseKind::NewAppliances,
        WarehouseKind::UsedAppliances,
    ];

    /// The physical table backing this warehouse.
    pub const fn table(&self) -> &'static str {
        match self {
            WarehouseKind::NewParts => "new_parts",
            WarehouseKind::UsedParts => "used_parts",
            WarehouseKind::NewAppliances => "new_appliances",
            WarehouseKind::UsedAppliances => "used_appliances",
        }
    }

    /// Part warehouses carry batch/expiry attributes; appliance warehouses
    /// carry serial/source attributes.
    pub const fn is_parts(&self) -> bool {
        matches!(self, WarehouseKind::NewParts | WarehouseKind::UsedParts)
    }

    /// The status a soft-deleted item takes in this warehouse. New stock is
    /// parked as unavailable (it may come back); used stock is scrapped.
    pub const fn soft_delete_target(&self) -> StockStatus {
        match self {
            WarehouseKind::NewParts | WarehouseKind::NewAppliances => StockStatus::Unavailable,
            WarehouseKind::UsedParts | WarehouseKind::UsedAppliances => StockStatus::Scrapped,
        }
    }

    /// Stable string form, identical to the table name.
    pub const fn as_str(&self) -> &'static str {
        self.table()
    }
}

impl std::fmt::Display for WarehouseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Stock Items
// =============================================================================

/// Lifecycle status of a stock item.
///
/// ```text
/// available ──(consume to zero)──► consumed
/// available | consumed ──(soft delete)──► unavailable | scrapped
/// unavailable | scrapped ──(restore)──► prior status
/// any ──(hard delete)──► row removed, tombstoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Counted in availability, open to consumption.
    Available,
    /// Fully used up; kept for history.
    Consumed,
    /// Soft-deleted new stock.
    Unavailable,
    /// Soft-deleted used stock.
    Scrapped,
}

impl StockStatus {
    /// Whether this status is a soft-delete parking state.
    pub const fn is_soft_deleted(&self) -> bool {
        matches!(self, StockStatus::Unavailable | StockStatus::Scrapped)
    }
}

/// Kind-specific stock attributes. Part warehouses track purchase batches;
/// appliance warehouses track individual serials and where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum StockDetails {
    Part {
        batch_no: Option<String>,
        expiry_date: Option<NaiveDate>,
    },
    Appliance {
        serial_no: Option<String>,
        source_name: Option<String>,
    },
}

impl StockDetails {
    /// Empty details for the family a warehouse kind belongs to.
    pub fn empty_for(kind: WarehouseKind) -> StockDetails {
        if kind.is_parts() {
            StockDetails::Part {
                batch_no: None,
                expiry_date: None,
            }
        } else {
            StockDetails::Appliance {
                serial_no: None,
                source_name: None,
            }
        }
    }

    /// Whether this details variant belongs in the given warehouse.
    pub fn matches(&self, kind: WarehouseKind) -> bool {
        matches!(self, StockDetails::Part { .. }) == kind.is_parts()
    }
}

/// One unit or batch of inventory held in exactly one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Unique identifier within the warehouse table (UUID v4).
    pub id: String,

    /// Which warehouse the item lives in.
    pub warehouse: WarehouseKind,

    /// Key into the external part/device catalog.
    pub catalog_ref: String,

    /// On-hand quantity, never negative.
    pub quantity: i64,

    /// Purchase price per unit in minor units.
    pub unit_purchase_cents: i64,

    /// Sale price per unit in minor units.
    pub unit_sale_cents: i64,

    pub status: StockStatus,

    /// Kind-specific attributes.
    pub details: StockDetails,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Returns the unit purchase price as Money.
    #[inline]
    pub fn unit_purchase_price(&self) -> Money {
        Money::from_cents(self.unit_purchase_cents)
    }

    /// Returns the unit sale price as Money.
    #[inline]
    pub fn unit_sale_price(&self) -> Money {
        Money::from_cents(self.unit_sale_cents)
    }
}

/// Input for receiving stock into a warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStockItem {
    pub warehouse: WarehouseKind,
    pub catalog_ref: String,
    /// Received quantity, >= 0.
    pub quantity: i64,
    pub unit_purchase_cents: i64,
    pub unit_sale_cents: i64,
    /// Kind-specific attributes; must match the warehouse family.
    pub details: StockDetails,
    /// Purchase document / invoice reference for the audit entry.
    pub related_document: Option<String>,
    pub operator: String,
}

/// Closed partial update for a stock item. Every patchable field is an
/// explicit `Option`, so the patch surface is enumerable at compile time
/// instead of an open key/value map. Fields from the wrong family
/// (e.g. `serial_no` on a parts item) are rejected at validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockItemPatch {
    pub catalog_ref: Option<String>,
    pub quantity: Option<i64>,
    pub unit_purchase_cents: Option<i64>,
    pub unit_sale_cents: Option<i64>,
    pub status: Option<StockStatus>,
    // Part-family fields.
    pub batch_no: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    // Appliance-family fields.
    pub serial_no: Option<String>,
    pub source_name: Option<String>,
}

impl StockItemPatch {
    /// True when no field is set; such a patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.catalog_ref.is_none()
            && self.quantity.is_none()
            && self.unit_purchase_cents.is_none()
            && self.unit_sale_cents.is_none()
            && self.status.is_none()
            && self.batch_no.is_none()
            && self.expiry_date.is_none()
            && self.serial_no.is_none()
            && self.source_name.is_none()
    }

    /// Whether applying this patch would change quantity, a price, or
    /// status - the changes that warrant an adjustment audit entry.
    pub fn is_material(&self, current: &StockItem) -> bool {
        self.quantity.is_some_and(|q| q != current.quantity)
            || self
                .unit_purchase_cents
                .is_some_and(|p| p != current.unit_purchase_cents)
            || self
                .unit_sale_cents
                .is_some_and(|p| p != current.unit_sale_cents)
            || self.status.is_some_and(|s| s != current.status)
    }
}

/// Read filter for stock items.
#[derive(Debug, Clone)]
pub struct StockFilter {
    pub catalog_ref: Option<String>,
    pub status: Option<StockStatus>,
    /// When false, only `available` rows are returned.
    pub include_unavailable: bool,
}

impl Default for StockFilter {
    fn default() -> Self {
        StockFilter {
            catalog_ref: None,
            status: None,
            include_unavailable: false,
        }
    }
}

/// A stock item joined with read-only catalog display fields. The join is
/// display convenience; the catalog stays owned by its external system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedStockItem {
    pub item: StockItem,
    pub catalog_name: Option<String>,
    pub catalog_brand: Option<String>,
}

/// A catalog entry whose available parts quantity fell below its
/// catalog-owned minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub catalog_ref: String,
    pub name: String,
    pub available: i64,
    pub min_stock: i64,
}

/// An entry in the external part/device catalog. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogItem {
    pub catalog_ref: String,
    pub name: String,
    pub brand: Option<String>,
    pub min_stock: i64,
}

// =============================================================================
// Inventory Audit Entries
// =============================================================================

/// What kind of stock movement an inventory entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum InventoryEntryKind {
    Purchase,
    Adjustment,
    SoftDelete,
    HardDelete,
    Restore,
}

/// Append-only audit record of a stock movement. `quantity_delta` and
/// `total_cents` are signed: inflows positive, outflows negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryEntry {
    pub id: String,
    pub kind: InventoryEntryKind,
    pub warehouse: WarehouseKind,
    pub item_id: String,
    pub quantity_delta: i64,
    pub unit_price_cents: i64,
    /// quantity_delta × unit_price_cents.
    pub total_cents: i64,
    /// Reference to the business document that caused the movement.
    pub related_document: Option<String>,
    pub operator: String,
    pub occurred_at: DateTime<Utc>,
}

/// Input for appending an inventory entry. The total is derived at append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInventoryEntry {
    pub kind: InventoryEntryKind,
    pub warehouse: WarehouseKind,
    pub item_id: String,
    pub quantity_delta: i64,
    pub unit_price_cents: i64,
    pub related_document: Option<String>,
    pub operator: String,
}

/// Read filter for inventory entries.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub warehouse: Option<WarehouseKind>,
    pub item_id: Option<String>,
    pub kind: Option<InventoryEntryKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// =============================================================================
// Deletion Records
// =============================================================================

/// Whether a deletion kept the row (soft) or removed it (hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionMode {
    Soft,
    Hard,
}

/// A deletion tombstone. Soft records remember the status flip; hard
/// records carry a full snapshot of the removed row, sufficient to
/// re-create the item on restore. Callers always see the merged type;
/// which physical table a record came from is a storage detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionRecord {
    pub id: String,
    pub mode: DeletionMode,
    pub warehouse: WarehouseKind,
    pub item_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub reason: Option<String>,
    /// Status the item had before deletion; restore returns to it.
    pub prior_status: StockStatus,
    /// Status the soft delete applied. None for hard deletions.
    pub new_status: Option<StockStatus>,
    /// Full row snapshot. None for soft deletions.
    pub snapshot: Option<StockItem>,
    pub operator: String,
    pub deleted_at: DateTime<Utc>,
}

// =============================================================================
// Operation Outcomes
// =============================================================================

/// Result of the secondary, failure-tolerant audit append. A lost append
/// never unwinds the primary mutation that triggered it; it is logged and
/// reported here so callers can see it instead of it being swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    /// The audit entry was appended; carries its id.
    Recorded(String),
    /// The append failed; the primary mutation stands.
    Lost,
}

impl AuditOutcome {
    #[inline]
    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditOutcome::Recorded(_))
    }
}

/// Outcome of receiving stock.
#[derive(Debug, Clone)]
pub struct ReceiveOutcome {
    pub item: StockItem,
    pub audit: AuditOutcome,
}

/// Outcome of a stock item update.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// False when the patch was empty and nothing was touched.
    pub updated: bool,
    /// Present when the change was material and an adjustment was attempted.
    pub audit: Option<AuditOutcome>,
}

/// Outcome of consuming stock.
#[derive(Debug, Clone)]
pub struct ConsumeOutcome {
    pub item: StockItem,
    pub audit: AuditOutcome,
}

/// Outcome of a soft or hard deletion.
#[derive(Debug, Clone)]
pub struct DeletionOutcome {
    pub record: DeletionRecord,
    pub audit: AuditOutcome,
}

/// Outcome of a restore. For hard restores `item` is the re-created row
/// under its fresh id.
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    pub item: StockItem,
    pub audit: AuditOutcome,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_delete_targets() {
        assert_eq!(
            WarehouseKind::NewParts.soft_delete_target(),
            StockStatus::Unavailable
        );
        assert_eq!(
            WarehouseKind::UsedParts.soft_delete_target(),
            StockStatus::Scrapped
        );
        assert_eq!(
            WarehouseKind::NewAppliances.soft_delete_target(),
            StockStatus::Unavailable
        );
        assert_eq!(
            WarehouseKind::UsedAppliances.soft_delete_target(),
            StockStatus::Scrapped
        );
    }

    #[test]
    fn test_warehouse_tables_are_distinct() {
        let tables: Vec<&str> = WarehouseKind::ALL.iter().map(|k| k.table()).collect();
        for (i, a) in tables.iter().enumerate() {
            for b in &tables[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_details_family_matching() {
        let part = StockDetails::empty_for(WarehouseKind::NewParts);
        assert!(part.matches(WarehouseKind::UsedParts));
        assert!(!part.matches(WarehouseKind::NewAppliances));

        let appliance = StockDetails::empty_for(WarehouseKind::UsedAppliances);
        assert!(appliance.matches(WarehouseKind::NewAppliances));
        assert!(!appliance.matches(WarehouseKind::NewParts));
    }

    #[test]
    fn test_reversed_kind() {
        assert_eq!(
            LedgerEntryKind::Payment.reversed(),
            LedgerEntryKind::Receipt
        );
        assert_eq!(
            LedgerEntryKind::Receipt.reversed(),
            LedgerEntryKind::Payment
        );
        assert_eq!(
            LedgerEntryKind::Transfer.reversed(),
            LedgerEntryKind::Transfer
        );
    }

    #[test]
    fn test_empty_patch() {
        let patch = StockItemPatch::default();
        assert!(patch.is_empty());

        let patch = StockItemPatch {
            quantity: Some(5),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        assert!(AccountPatch::default().is_empty());
    }

    #[test]
    fn test_patch_materiality() {
        let item = sample_item();

        // Same values: not material even though fields are set.
        let patch = StockItemPatch {
            quantity: Some(item.quantity),
            status: Some(item.status),
            ..Default::default()
        };
        assert!(!patch.is_material(&item));

        let patch = StockItemPatch {
            quantity: Some(item.quantity + 1),
            ..Default::default()
        };
        assert!(patch.is_material(&item));

        // Batch number alone is bookkeeping, not a movement.
        let patch = StockItemPatch {
            batch_no: Some("B-77".into()),
            ..Default::default()
        };
        assert!(!patch.is_material(&item));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let item = sample_item();
        let json = serde_json::to_string(&item).unwrap();
        let back: StockItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    fn sample_item() -> StockItem {
        StockItem {
            id: "c5a5e6a0-0000-4000-8000-000000000001".into(),
            warehouse: WarehouseKind::NewParts,
            catalog_ref: "PRT-100".into(),
            quantity: 10,
            unit_purchase_cents: 5000,
            unit_sale_cents: 6500,
            status: StockStatus::Available,
            details: StockDetails::Part {
                batch_no: Some("B-1".into()),
                expiry_date: None,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
