//! # Inventory Log Recorder
//!
//! Append-only audit trail of stock movements. One entry per receipt,
//! adjustment, deletion or restore, keyed by (warehouse kind, item id).
//!
//! ## The Tolerated Failure Path
//! A failed append through [`InventoryLogRecorder::try_append`] does NOT
//! roll back the stock mutation that triggered it. The stock operation has
//! already committed; the loss is logged at `warn` and surfaced to the
//! caller as [`AuditOutcome::Lost`]. This is the engine's one soft failure
//! path - everywhere else, failure is total-or-nothing.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DbResult;
use tally_core::{
    AuditOutcome, ChangeNotifier, EntityKind, InventoryEntry, InventoryFilter, Money,
    NewInventoryEntry,
};

const ENTRY_COLUMNS: &str = "id, kind, warehouse, item_id, quantity_delta, unit_price_cents, \
     total_cents, related_document, operator, occurred_at";

/// Records stock movements. Pure append; nothing here is ever updated or
/// deleted.
#[derive(Clone)]
pub struct InventoryLogRecorder {
    pool: SqlitePool,
    notifier: Arc<dyn ChangeNotifier>,
}

impl InventoryLogRecorder {
    /// Creates a new InventoryLogRecorder.
    pub fn new(pool: SqlitePool, notifier: Arc<dyn ChangeNotifier>) -> Self {
        InventoryLogRecorder { pool, notifier }
    }

    /// Appends an entry. The signed total is derived from delta × unit
    /// price.
    pub async fn record(&self, spec: NewInventoryEntry) -> DbResult<InventoryEntry> {
        let entry = Self::build(spec);

        debug!(
            id = %entry.id,
            kind = ?entry.kind,
            warehouse = %entry.warehouse,
            item = %entry.item_id,
            delta = entry.quantity_delta,
            "appending inventory entry"
        );

        sqlx::query(
            "INSERT INTO inventory_entries (
                id, kind, warehouse, item_id, quantity_delta,
                unit_price_cents, total_cents, related_document, operator, occurred_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&entry.id)
        .bind(entry.kind)
        .bind(entry.warehouse)
        .bind(&entry.item_id)
        .bind(entry.quantity_delta)
        .bind(entry.unit_price_cents)
        .bind(entry.total_cents)
        .bind(&entry.related_document)
        .bind(&entry.operator)
        .bind(entry.occurred_at)
        .execute(&self.pool)
        .await?;

        self.notifier.changed(EntityKind::InventoryEntries);
        Ok(entry)
    }

    /// Appends an entry under the failure-tolerant policy: the caller's
    /// primary mutation has already committed, so an append failure is
    /// logged and reported as `Lost` rather than propagated.
    pub async fn try_append(&self, spec: NewInventoryEntry) -> AuditOutcome {
        let warehouse = spec.warehouse;
        let item_id = spec.item_id.clone();
        match self.record(spec).await {
            Ok(entry) => AuditOutcome::Recorded(entry.id),
            Err(err) => {
                warn!(
                    warehouse = %warehouse,
                    item = %item_id,
                    error = %err,
                    "inventory audit entry lost; primary mutation stands"
                );
                AuditOutcome::Lost
            }
        }
    }

    /// Lists entries, newest first, with optional filters.
    pub async fn list(&self, filter: InventoryFilter) -> DbResult<Vec<InventoryEntry>> {
        let mut sql = format!("SELECT {ENTRY_COLUMNS} FROM inventory_entries WHERE 1=1");
        if filter.warehouse.is_some() {
            sql.push_str(" AND warehouse = ?");
        }
        if filter.item_id.is_some() {
            sql.push_str(" AND item_id = ?");
        }
        if filter.kind.is_some() {
            sql.push_str(" AND kind = ?");
        }
        if filter.from.is_some() {
            sql.push_str(" AND occurred_at >= ?");
        }
        if filter.to.is_some() {
            sql.push_str(" AND occurred_at <= ?");
        }
        sql.push_str(" ORDER BY occurred_at DESC, id DESC");

        let mut query = sqlx::query_as::<_, InventoryEntry>(&sql);
        if let Some(warehouse) = filter.warehouse {
            query = query.bind(warehouse);
        }
        if let Some(item_id) = &filter.item_id {
            query = query.bind(item_id.clone());
        }
        if let Some(kind) = filter.kind {
            query = query.bind(kind);
        }
        if let Some(from) = filter.from {
            query = query.bind(from);
        }
        if let Some(to) = filter.to {
            query = query.bind(to);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    fn build(spec: NewInventoryEntry) -> InventoryEntry {
        let total = Money::from_cents(spec.unit_price_cents).multiply_quantity(spec.quantity_delta);
        InventoryEntry {
            id: Uuid::new_v4().to_string(),
            kind: spec.kind,
            warehouse: spec.warehouse,
            item_id: spec.item_id,
            quantity_delta: spec.quantity_delta,
            unit_price_cents: spec.unit_price_cents,
            total_cents: total.cents(),
            related_document: spec.related_document,
            operator: spec.operator,
            occurred_at: Utc::now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
