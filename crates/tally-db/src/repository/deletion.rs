//! # Deletion Log
//!
//! The soft/hard delete state machine over stock items, with restore.
//!
//! ## State Machine
//! ```text
//! available | consumed ──(soft delete)──► unavailable (new stock)
//!                                         scrapped    (used stock)
//!        ▲                                    │
//!        └────────────(restore)───────────────┘   record removed
//!
//! any status ──(hard delete)──► row removed, full snapshot tombstoned
//!                                    │
//!        ┌────────────(restore)──────┘   NEW row under a fresh id,
//!        ▼                               record removed
//! re-created item
//! ```
//!
//! Soft and hard tombstones live in two physical tables; callers only see
//! the merged `DeletionRecord` type. Status flip / row removal and the
//! tombstone insert always commit together; the inventory audit append on
//! top follows the failure-tolerant policy.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::inventory_log::InventoryLogRecorder;
use crate::repository::stock::{columns, insert_item, row_to_item};
use tally_core::{
    ChangeNotifier, CoreError, DeletionMode, DeletionOutcome, DeletionRecord, EntityKind,
    InventoryEntryKind, NewInventoryEntry, RestoreOutcome, StockItem, WarehouseKind,
};

const SOFT_COLUMNS: &str = "id, warehouse, item_id, quantity, unit_price_cents, reason, \
     prior_status, new_status, operator, deleted_at";

const HARD_COLUMNS: &str = "id, warehouse, item_id, quantity, unit_price_cents, reason, \
     prior_status, snapshot, operator, deleted_at";

/// Drives soft/hard deletion and restore over the warehouse tables,
/// producing tombstone records.
#[derive(Clone)]
pub struct DeletionLog {
    pool: SqlitePool,
    notifier: Arc<dyn ChangeNotifier>,
    log: InventoryLogRecorder,
}

impl DeletionLog {
    /// Creates a new DeletionLog.
    pub fn new(pool: SqlitePool, notifier: Arc<dyn ChangeNotifier>) -> Self {
        let log = InventoryLogRecorder::new(pool.clone(), notifier.clone());
        DeletionLog {
            pool,
            notifier,
            log,
        }
    }

    /// Soft-deletes an item: snapshots its current status as the prior
    /// status and parks it in the per-kind target status. The status flip
    /// and the tombstone commit together.
    pub async fn soft_delete(
        &self,
        kind: WarehouseKind,
        item_id: &str,
        reason: Option<String>,
        operator: &str,
    ) -> DbResult<DeletionOutcome> {
        let mut tx = self.pool.begin().await?;

        let item = fetch_item_tx(&mut tx, kind, item_id).await?;
        if item.status.is_soft_deleted() {
            return Err(CoreError::InvalidStatusChange {
                warehouse: kind,
                item_id: item_id.to_string(),
                status: item.status,
                operation: "soft delete",
            }
            .into());
        }

        let target = kind.soft_delete_target();
        let record = DeletionRecord {
            id: Uuid::new_v4().to_string(),
            mode: DeletionMode::Soft,
            warehouse: kind,
            item_id: item_id.to_string(),
            quantity: item.quantity,
            unit_price_cents: item.unit_purchase_cents,
            reason,
            prior_status: item.status,
            new_status: Some(target),
            snapshot: None,
            operator: operator.to_string(),
            deleted_at: Utc::now(),
        };

        let sql = format!(
            "UPDATE {} SET status = ?2, updated_at = ?3 WHERE id = ?1",
            kind.table()
        );
        sqlx::query(&sql)
            .bind(item_id)
            .bind(target)
            .bind(record.deleted_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query(&format!(
            "INSERT INTO soft_deletions ({SOFT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))
        .bind(&record.id)
        .bind(record.warehouse)
        .bind(&record.item_id)
        .bind(record.quantity)
        .bind(record.unit_price_cents)
        .bind(&record.reason)
        .bind(record.prior_status)
        .bind(record.new_status)
        .bind(&record.operator)
        .bind(record.deleted_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = %record.id, item = %item_id, warehouse = %kind, "soft deleted");

        let audit = self
            .log
            .try_append(NewInventoryEntry {
                kind: InventoryEntryKind::SoftDelete,
                warehouse: kind,
                item_id: item_id.to_string(),
                quantity_delta: -record.quantity,
                unit_price_cents: record.unit_price_cents,
                related_document: Some(record.id.clone()),
                operator: operator.to_string(),
            })
            .await;

        self.notifier.changed(EntityKind::Stock(kind));
        self.notifier.changed(EntityKind::Deletions);
        Ok(DeletionOutcome { record, audit })
    }

    /// Hard-deletes an item: removes the row and tombstones a full
    /// snapshot. Row removal and tombstone commit together; the audit
    /// append is attempted afterwards and does not block the deletion.
    pub async fn hard_delete(
        &self,
        kind: WarehouseKind,
        item_id: &str,
        reason: Option<String>,
        operator: &str,
    ) -> DbResult<DeletionOutcome> {
        let mut tx = self.pool.begin().await?;

        let item = fetch_item_tx(&mut tx, kind, item_id).await?;
        let snapshot_json = serde_json::to_string(&item)
            .map_err(|e| DbError::Internal(format!("snapshot serialization: {e}")))?;

        let record = DeletionRecord {
            id: Uuid::new_v4().to_string(),
            mode: DeletionMode::Hard,
            warehouse: kind,
            item_id: item_id.to_string(),
            quantity: item.quantity,
            unit_price_cents: item.unit_purchase_cents,
            reason,
            prior_status: item.status,
            new_status: None,
            snapshot: Some(item.clone()),
            operator: operator.to_string(),
            deleted_at: Utc::now(),
        };

        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
        sqlx::query(&sql).bind(item_id).execute(&mut *tx).await?;

        sqlx::query(&format!(
            "INSERT INTO hard_deletions ({HARD_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))
        .bind(&record.id)
        .bind(record.warehouse)
        .bind(&record.item_id)
        .bind(record.quantity)
        .bind(record.unit_price_cents)
        .bind(&record.reason)
        .bind(record.prior_status)
        .bind(&snapshot_json)
        .bind(&record.operator)
        .bind(record.deleted_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = %record.id, item = %item_id, warehouse = %kind, "hard deleted");

        let audit = self
            .log
            .try_append(NewInventoryEntry {
                kind: InventoryEntryKind::HardDelete,
                warehouse: kind,
                item_id: item_id.to_string(),
                quantity_delta: -record.quantity,
                unit_price_cents: record.unit_price_cents,
                related_document: Some(record.id.clone()),
                operator: operator.to_string(),
            })
            .await;

        self.notifier.changed(EntityKind::Stock(kind));
        self.notifier.changed(EntityKind::Deletions);
        Ok(DeletionOutcome { record, audit })
    }

    /// Reverses a deletion and consumes its record.
    ///
    /// Soft: the surviving row returns to its prior status. Hard: a NEW
    /// item is re-created from the snapshot under a fresh id; the old row
    /// is never resurrected.
    pub async fn restore(
        &self,
        kind: WarehouseKind,
        deletion_record_id: &str,
    ) -> DbResult<RestoreOutcome> {
        if let Some(record) = self.fetch_soft(kind, deletion_record_id).await? {
            return self.restore_soft(record).await;
        }
        if let Some(record) = self.fetch_hard(kind, deletion_record_id).await? {
            return self.restore_hard(record).await;
        }
        Err(DbError::not_found("deletion record", deletion_record_id))
    }

    /// Lists deletion tombstones of both modes as one record set, ordered
    /// by deletion time descending.
    pub async fn list_deletions(
        &self,
        kind: Option<WarehouseKind>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<DeletionRecord>> {
        let mut records = Vec::new();

        for (table, cols, mode) in [
            ("soft_deletions", SOFT_COLUMNS, DeletionMode::Soft),
            ("hard_deletions", HARD_COLUMNS, DeletionMode::Hard),
        ] {
            let mut sql = format!("SELECT {cols} FROM {table} WHERE 1=1");
            if kind.is_some() {
                sql.push_str(" AND warehouse = ?");
            }
            if from.is_some() {
                sql.push_str(" AND deleted_at >= ?");
            }
            if to.is_some() {
                sql.push_str(" AND deleted_at <= ?");
            }

            let mut query = sqlx::query(&sql);
            if let Some(kind) = kind {
                query = query.bind(kind);
            }
            if let Some(from) = from {
                query = query.bind(from);
            }
            if let Some(to) = to {
                query = query.bind(to);
            }

            let rows = query.fetch_all(&self.pool).await?;
            for row in &rows {
                records.push(row_to_record(mode, row)?);
            }
        }

        // Single time-ordered merge over both tombstone kinds.
        records.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn restore_soft(&self, record: DeletionRecord) -> DbResult<RestoreOutcome> {
        let kind = record.warehouse;
        let mut tx = self.pool.begin().await?;

        // The row must still exist (it survives a soft delete).
        let mut item = fetch_item_tx(&mut tx, kind, &record.item_id).await?;

        let now = Utc::now();
        let sql = format!(
            "UPDATE {} SET status = ?2, updated_at = ?3 WHERE id = ?1",
            kind.table()
        );
        sqlx::query(&sql)
            .bind(&record.item_id)
            .bind(record.prior_status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM soft_deletions WHERE id = ?1")
            .bind(&record.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        item.status = record.prior_status;
        item.updated_at = now;

        debug!(record = %record.id, item = %record.item_id, "soft deletion restored");

        let audit = self.append_restore(&record).await;
        self.notifier.changed(EntityKind::Stock(kind));
        self.notifier.changed(EntityKind::Deletions);
        Ok(RestoreOutcome { item, audit })
    }

    async fn restore_hard(&self, record: DeletionRecord) -> DbResult<RestoreOutcome> {
        let kind = record.warehouse;
        let snapshot = record
            .snapshot
            .clone()
            .ok_or_else(|| DbError::Internal("hard deletion record without snapshot".into()))?;

        // Re-create under a fresh id; the original id stays dead.
        let item = StockItem {
            id: Uuid::new_v4().to_string(),
            updated_at: Utc::now(),
            ..snapshot
        };

        let mut tx = self.pool.begin().await?;
        insert_item(&mut *tx, &item).await?;
        sqlx::query("DELETE FROM hard_deletions WHERE id = ?1")
            .bind(&record.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(
            record = %record.id,
            old_item = %record.item_id,
            new_item = %item.id,
            "hard deletion restored"
        );

        let audit = self.append_restore(&record).await;
        self.notifier.changed(EntityKind::Stock(kind));
        self.notifier.changed(EntityKind::Deletions);
        Ok(RestoreOutcome { item, audit })
    }

    async fn append_restore(&self, record: &DeletionRecord) -> tally_core::AuditOutcome {
        self.log
            .try_append(NewInventoryEntry {
                kind: InventoryEntryKind::Restore,
                warehouse: record.warehouse,
                item_id: record.item_id.clone(),
                quantity_delta: record.quantity,
                unit_price_cents: record.unit_price_cents,
                related_document: Some(record.id.clone()),
                operator: record.operator.clone(),
            })
            .await
    }

    async fn fetch_soft(
        &self,
        kind: WarehouseKind,
        id: &str,
    ) -> DbResult<Option<DeletionRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {SOFT_COLUMNS} FROM soft_deletions WHERE id = ?1 AND warehouse = ?2"
        ))
        .bind(id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row_to_record(DeletionMode::Soft, &row))
            .transpose()
    }

    async fn fetch_hard(
        &self,
        kind: WarehouseKind,
        id: &str,
    ) -> DbResult<Option<DeletionRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {HARD_COLUMNS} FROM hard_deletions WHERE id = ?1 AND warehouse = ?2"
        ))
        .bind(id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row_to_record(DeletionMode::Hard, &row))
            .transpose()
    }
}

async fn fetch_item_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    kind: WarehouseKind,
    item_id: &str,
) -> DbResult<StockItem> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        columns(kind),
        kind.table()
    );
    let row = sqlx::query(&sql)
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?;
    match row {
        Some(row) => Ok(row_to_item(kind, &row)?),
        None => Err(DbError::not_found("stock item", item_id)),
    }
}

fn row_to_record(mode: DeletionMode, row: &SqliteRow) -> DbResult<DeletionRecord> {
    let (new_status, snapshot) = match mode {
        DeletionMode::Soft => (row.try_get("new_status")?, None),
        DeletionMode::Hard => {
            let json: String = row.try_get("snapshot")?;
            let snapshot: StockItem = serde_json::from_str(&json)
                .map_err(|e| DbError::Internal(format!("snapshot deserialization: {e}")))?;
            (None, Some(snapshot))
        }
    };

    Ok(DeletionRecord {
        id: row.try_get("id")?,
        mode,
        warehouse: row.try_get("warehouse")?,
        item_id: row.try_get("item_id")?,
        quantity: row.try_get("quantity")?,
        unit_price_cents: row.try_get("unit_price_cents")?,
        reason: row.try_get("reason")?,
        prior_status: row.try_get("prior_status")?,
        new_status,
        snapshot,
        operator: row.try_get("operator")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::{
        InventoryFilter, NewStockItem, StockDetails, StockStatus,
    };

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn receive(db: &Database, kind: WarehouseKind, quantity: i64) -> StockItem {
        db.warehouse()
            .receive(NewStockItem {
                warehouse: kind,
                catalog_ref: "CAT-1".into(),
                quantity,
                unit_purchase_cents: 5000,
                unit_sale_cents: 6500,
                details: StockDetails::empty_for(kind),
                related_document: None,
                operator: "tester".into(),
            })
            .await
            .unwrap()
            .item
    }

    /// The field values that must survive a soft delete + restore cycle
    /// untouched.
    fn business_fields(item: &StockItem) -> (String, i64, i64, i64, StockStatus, StockDetails) {
        (
            item.catalog_ref.clone(),
            item.quantity,
            item.unit_purchase_cents,
            item.unit_sale_cents,
            item.status,
            item.details.clone(),
        )
    }

    #[tokio::test]
    async fn test_soft_delete_applies_per_kind_target() {
        let db = test_db().await;
        let deletions = db.deletions();

        for kind in WarehouseKind::ALL {
            let item = receive(&db, kind, 3).await;
            let outcome = deletions
                .soft_delete(kind, &item.id, Some("shelf damage".into()), "tester")
                .await
                .unwrap();

            assert_eq!(outcome.record.mode, DeletionMode::Soft);
            assert_eq!(outcome.record.prior_status, StockStatus::Available);
            assert_eq!(outcome.record.new_status, Some(kind.soft_delete_target()));

            let parked = db.warehouse().get(kind, &item.id).await.unwrap();
            assert_eq!(parked.status, kind.soft_delete_target());
        }
    }

    #[tokio::test]
    async fn test_soft_delete_twice_is_rejected() {
        let db = test_db().await;
        let deletions = db.deletions();
        let item = receive(&db, WarehouseKind::NewParts, 3).await;

        deletions
            .soft_delete(WarehouseKind::NewParts, &item.id, None, "tester")
            .await
            .unwrap();
        let err = deletions
            .soft_delete(WarehouseKind::NewParts, &item.id, None, "tester")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusChange { .. })
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_then_restore_round_trips_fields() {
        let db = test_db().await;
        let deletions = db.deletions();
        let item = receive(&db, WarehouseKind::NewParts, 10).await;
        let before = business_fields(&item);

        let deleted = deletions
            .soft_delete(WarehouseKind::NewParts, &item.id, None, "tester")
            .await
            .unwrap();
        assert_eq!(
            db.warehouse()
                .available_parts_quantity("CAT-1")
                .await
                .unwrap(),
            0
        );

        let restored = deletions
            .restore(WarehouseKind::NewParts, &deleted.record.id)
            .await
            .unwrap();

        // Same row, same business fields, prior status back.
        assert_eq!(restored.item.id, item.id);
        assert_eq!(business_fields(&restored.item), before);
        assert_eq!(
            db.warehouse()
                .available_parts_quantity("CAT-1")
                .await
                .unwrap(),
            10
        );

        // The record was consumed.
        assert!(deletions
            .list_deletions(None, None, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_hard_delete_removes_row_and_restore_recreates() {
        let db = test_db().await;
        let deletions = db.deletions();
        let item = receive(&db, WarehouseKind::UsedAppliances, 1).await;
        let before = business_fields(&item);

        let deleted = deletions
            .hard_delete(
                WarehouseKind::UsedAppliances,
                &item.id,
                Some("beyond repair".into()),
                "tester",
            )
            .await
            .unwrap();
        assert_eq!(deleted.record.mode, DeletionMode::Hard);
        assert!(deleted.record.snapshot.is_some());

        // The row is gone.
        let err = db
            .warehouse()
            .get(WarehouseKind::UsedAppliances, &item.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let restored = deletions
            .restore(WarehouseKind::UsedAppliances, &deleted.record.id)
            .await
            .unwrap();

        // A new identity carrying the old business fields.
        assert_ne!(restored.item.id, item.id);
        assert_eq!(business_fields(&restored.item), before);

        assert!(deletions
            .list_deletions(None, None, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_restore_unknown_record() {
        let db = test_db().await;
        let err = db
            .deletions()
            .restore(WarehouseKind::NewParts, "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_restore_checks_warehouse_kind() {
        let db = test_db().await;
        let deletions = db.deletions();
        let item = receive(&db, WarehouseKind::NewParts, 2).await;

        let deleted = deletions
            .soft_delete(WarehouseKind::NewParts, &item.id, None, "tester")
            .await
            .unwrap();

        // The record belongs to new_parts; other kinds do not see it.
        let err = deletions
            .restore(WarehouseKind::UsedParts, &deleted.record.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_deletions_merges_both_modes_sorted() {
        let db = test_db().await;
        let deletions = db.deletions();

        for _ in 0..2 {
            let item = receive(&db, WarehouseKind::NewParts, 1).await;
            deletions
                .soft_delete(WarehouseKind::NewParts, &item.id, None, "tester")
                .await
                .unwrap();
        }
        for _ in 0..3 {
            let item = receive(&db, WarehouseKind::UsedParts, 1).await;
            deletions
                .hard_delete(WarehouseKind::UsedParts, &item.id, None, "tester")
                .await
                .unwrap();
        }

        let records = deletions.list_deletions(None, None, None).await.unwrap();
        assert_eq!(records.len(), 5);
        assert!(records
            .windows(2)
            .all(|pair| pair[0].deleted_at >= pair[1].deleted_at));

        let soft_only = deletions
            .list_deletions(Some(WarehouseKind::NewParts), None, None)
            .await
            .unwrap();
        assert_eq!(soft_only.len(), 2);
        assert!(soft_only.iter().all(|r| r.mode == DeletionMode::Soft));
    }

    #[tokio::test]
    async fn test_deletion_flow_appends_audit_entries() {
        let db = test_db().await;
        let deletions = db.deletions();
        let item = receive(&db, WarehouseKind::NewParts, 4).await;

        let deleted = deletions
            .soft_delete(WarehouseKind::NewParts, &item.id, None, "tester")
            .await
            .unwrap();
        assert!(deleted.audit.is_recorded());

        let restored = deletions
            .restore(WarehouseKind::NewParts, &deleted.record.id)
            .await
            .unwrap();
        assert!(restored.audit.is_recorded());

        let entries = db
            .inventory_log()
            .list(InventoryFilter {
                item_id: Some(item.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        // purchase + soft_delete + restore
        assert_eq!(entries.len(), 3);
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&InventoryEntryKind::SoftDelete));
        assert!(kinds.contains(&InventoryEntryKind::Restore));

        // Deltas cancel out: -4 then +4.
        let soft = entries
            .iter()
            .find(|e| e.kind == InventoryEntryKind::SoftDelete)
            .unwrap();
        let restore = entries
            .iter()
            .find(|e| e.kind == InventoryEntryKind::Restore)
            .unwrap();
        assert_eq!(soft.quantity_delta, -4);
        assert_eq!(restore.quantity_delta, 4);
    }

    #[tokio::test]
    async fn test_hard_delete_survives_lost_audit_entry() {
        let db = test_db().await;
        let deletions = db.deletions();
        let item = receive(&db, WarehouseKind::NewParts, 1).await;

        sqlx::query("DROP TABLE inventory_entries")
            .execute(db.pool())
            .await
            .unwrap();

        // The deletion stands even though the audit append failed.
        let outcome = deletions
            .hard_delete(WarehouseKind::NewParts, &item.id, None, "tester")
            .await
            .unwrap();
        assert!(!outcome.audit.is_recorded());
        assert!(matches!(
            db.warehouse()
                .get(WarehouseKind::NewParts, &item.id)
                .await
                .unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
