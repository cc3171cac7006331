//! # Warehouse Store
//!
//! Stock operations over the four physically separate warehouse tables.
//!
//! ## One Concept, Four Tables
//! ```text
//! WarehouseKind ──┬── new_parts       ┐ batch_no / expiry_date
//!                 ├── used_parts      ┘
//!                 ├── new_appliances  ┐ serial_no / source_name
//!                 └── used_appliances ┘
//! ```
//! Every query dispatches through `WarehouseKind::table()`; callers only
//! ever see the merged `StockItem` type with its `StockDetails` variant.
//!
//! Stock mutations append to the inventory audit trail through the
//! failure-tolerant `try_append` path: the mutation commits first, a lost
//! audit entry is reported in the outcome, never propagated as an error.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::inventory_log::InventoryLogRecorder;
use tally_core::{
    validation::{validate_consume_quantity, validate_new_stock_item, validate_stock_patch},
    ChangeNotifier, ConsumeOutcome, CoreError, EntityKind, EnrichedStockItem, InventoryEntryKind,
    LowStockAlert, NewInventoryEntry, NewStockItem, ReceiveOutcome, StockDetails, StockFilter,
    StockItem, StockItemPatch, StockStatus, UpdateOutcome, WarehouseKind,
};

/// Repository for warehouse stock operations.
#[derive(Clone)]
pub struct WarehouseStore {
    pool: SqlitePool,
    notifier: Arc<dyn ChangeNotifier>,
    log: InventoryLogRecorder,
}

impl WarehouseStore {
    /// Creates a new WarehouseStore.
    pub fn new(pool: SqlitePool, notifier: Arc<dyn ChangeNotifier>) -> Self {
        let log = InventoryLogRecorder::new(pool.clone(), notifier.clone());
        WarehouseStore {
            pool,
            notifier,
            log,
        }
    }

    /// Receives stock into a warehouse: creates the item as `available`
    /// and appends a `purchase` audit entry.
    pub async fn receive(&self, spec: NewStockItem) -> DbResult<ReceiveOutcome> {
        validate_new_stock_item(&spec)?;

        let now = Utc::now();
        let item = StockItem {
            id: Uuid::new_v4().to_string(),
            warehouse: spec.warehouse,
            catalog_ref: spec.catalog_ref.trim().to_string(),
            quantity: spec.quantity,
            unit_purchase_cents: spec.unit_purchase_cents,
            unit_sale_cents: spec.unit_sale_cents,
            status: StockStatus::Available,
            details: spec.details,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %item.id,
            warehouse = %item.warehouse,
            catalog_ref = %item.catalog_ref,
            quantity = item.quantity,
            "receiving stock"
        );

        insert_item(&self.pool, &item).await?;

        let audit = self
            .log
            .try_append(NewInventoryEntry {
                kind: InventoryEntryKind::Purchase,
                warehouse: item.warehouse,
                item_id: item.id.clone(),
                quantity_delta: item.quantity,
                unit_price_cents: item.unit_purchase_cents,
                related_document: spec.related_document,
                operator: spec.operator,
            })
            .await;

        self.notifier.changed(EntityKind::Stock(item.warehouse));
        Ok(ReceiveOutcome { item, audit })
    }

    /// Gets a stock item by its composite key (warehouse kind, id).
    pub async fn get(&self, kind: WarehouseKind, item_id: &str) -> DbResult<StockItem> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            columns(kind),
            kind.table()
        );
        let row = sqlx::query(&sql)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row_to_item(kind, &row)?),
            None => Err(DbError::not_found("stock item", item_id)),
        }
    }

    /// Applies a partial update. The patch is a full-row write of the
    /// merged values (last writer wins at field level). An empty patch is
    /// a no-op returning `updated: false`. When quantity, a price, or
    /// status materially changed, an `adjustment` audit entry carries the
    /// quantity delta and the new purchase price.
    pub async fn update(
        &self,
        kind: WarehouseKind,
        item_id: &str,
        patch: StockItemPatch,
        operator: &str,
    ) -> DbResult<UpdateOutcome> {
        if patch.is_empty() {
            return Ok(UpdateOutcome {
                updated: false,
                audit: None,
            });
        }
        validate_stock_patch(kind, &patch)?;

        let current = self.get(kind, item_id).await?;
        let material = patch.is_material(&current);
        let quantity_delta = patch
            .quantity
            .map_or(0, |q| q - current.quantity);

        let merged = apply_patch(&current, patch);
        update_item(&self.pool, &merged).await?;

        debug!(
            id = %item_id,
            warehouse = %kind,
            material,
            "stock item updated"
        );

        let audit = if material {
            Some(
                self.log
                    .try_append(NewInventoryEntry {
                        kind: InventoryEntryKind::Adjustment,
                        warehouse: kind,
                        item_id: item_id.to_string(),
                        quantity_delta,
                        unit_price_cents: merged.unit_purchase_cents,
                        related_document: None,
                        operator: operator.to_string(),
                    })
                    .await,
            )
        } else {
            None
        };

        self.notifier.changed(EntityKind::Stock(kind));
        Ok(UpdateOutcome {
            updated: true,
            audit,
        })
    }

    /// Consumes quantity from an `available` item (a repair uses parts, a
    /// sale takes an appliance). The item flips to `consumed` when it
    /// reaches zero.
    pub async fn consume(
        &self,
        kind: WarehouseKind,
        item_id: &str,
        quantity: i64,
        related_document: Option<String>,
        operator: &str,
    ) -> DbResult<ConsumeOutcome> {
        validate_consume_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            columns(kind),
            kind.table()
        );
        let row = sqlx::query(&sql)
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?;
        let current = match row {
            Some(row) => row_to_item(kind, &row)?,
            None => return Err(DbError::not_found("stock item", item_id)),
        };

        if current.status != StockStatus::Available {
            return Err(CoreError::InvalidStatusChange {
                warehouse: kind,
                item_id: item_id.to_string(),
                status: current.status,
                operation: "consume",
            }
            .into());
        }
        if current.quantity < quantity {
            return Err(CoreError::InsufficientStock {
                warehouse: kind,
                item_id: item_id.to_string(),
                available: current.quantity,
                requested: quantity,
            }
            .into());
        }

        let mut item = current;
        item.quantity -= quantity;
        if item.quantity == 0 {
            item.status = StockStatus::Consumed;
        }
        item.updated_at = Utc::now();

        let sql = format!(
            "UPDATE {} SET quantity = ?2, status = ?3, updated_at = ?4 WHERE id = ?1",
            kind.table()
        );
        sqlx::query(&sql)
            .bind(item_id)
            .bind(item.quantity)
            .bind(item.status)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        // Consumption is an outflow valued at the sale price.
        let audit = self
            .log
            .try_append(NewInventoryEntry {
                kind: InventoryEntryKind::Adjustment,
                warehouse: kind,
                item_id: item_id.to_string(),
                quantity_delta: -quantity,
                unit_price_cents: item.unit_sale_cents,
                related_document,
                operator: operator.to_string(),
            })
            .await;

        self.notifier.changed(EntityKind::Stock(kind));
        Ok(ConsumeOutcome { item, audit })
    }

    /// Lists items in a warehouse. Without an explicit status filter,
    /// `include_unavailable: false` restricts to `available` rows.
    pub async fn list(&self, kind: WarehouseKind, filter: StockFilter) -> DbResult<Vec<StockItem>> {
        let mut sql = format!(
            "SELECT {} FROM {} WHERE 1=1",
            columns(kind),
            kind.table()
        );
        if filter.catalog_ref.is_some() {
            sql.push_str(" AND catalog_ref = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        } else if !filter.include_unavailable {
            sql.push_str(" AND status = 'available'");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(catalog_ref) = &filter.catalog_ref {
            query = query.bind(catalog_ref.clone());
        }
        if let Some(status) = filter.status {
            query = query.bind(status);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row_to_item(kind, row).map_err(DbError::from))
            .collect()
    }

    /// Lists items joined with catalog display fields. The join is read
    /// only; the catalog belongs to an external system.
    pub async fn list_enriched(
        &self,
        kind: WarehouseKind,
        filter: StockFilter,
    ) -> DbResult<Vec<EnrichedStockItem>> {
        let item_cols = columns(kind)
            .split(", ")
            .map(|c| format!("t.{c}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!(
            "SELECT {item_cols}, c.name AS catalog_name, c.brand AS catalog_brand
             FROM {} t LEFT JOIN catalog_items c ON c.catalog_ref = t.catalog_ref
             WHERE 1=1",
            kind.table()
        );
        if filter.catalog_ref.is_some() {
            sql.push_str(" AND t.catalog_ref = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND t.status = ?");
        } else if !filter.include_unavailable {
            sql.push_str(" AND t.status = 'available'");
        }
        sql.push_str(" ORDER BY t.created_at DESC, t.id DESC");

        let mut query = sqlx::query(&sql);
        if let Some(catalog_ref) = &filter.catalog_ref {
            query = query.bind(catalog_ref.clone());
        }
        if let Some(status) = filter.status {
            query = query.bind(status);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                let item = row_to_item(kind, row)?;
                Ok(EnrichedStockItem {
                    item,
                    catalog_name: row.try_get("catalog_name")?,
                    catalog_brand: row.try_get("catalog_brand")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(DbError::from)
    }

    /// Sums `available` quantity for a catalog entry across the new-parts
    /// and used-parts tables. Drives low-stock detection.
    pub async fn available_parts_quantity(&self, catalog_ref: &str) -> DbResult<i64> {
        let mut total = 0i64;
        for kind in [WarehouseKind::NewParts, WarehouseKind::UsedParts] {
            let sql = format!(
                "SELECT COALESCE(SUM(quantity), 0) FROM {}
                 WHERE catalog_ref = ?1 AND status = 'available'",
                kind.table()
            );
            let sum: i64 = sqlx::query_scalar(&sql)
                .bind(catalog_ref)
                .fetch_one(&self.pool)
                .await?;
            total += sum;
        }
        Ok(total)
    }

    /// Catalog entries whose available parts quantity is below the
    /// catalog-owned `min_stock` threshold.
    pub async fn low_stock_parts(&self) -> DbResult<Vec<LowStockAlert>> {
        let rows = sqlx::query_as::<_, (String, String, i64, i64)>(
            "SELECT c.catalog_ref, c.name, c.min_stock,
                    COALESCE((SELECT SUM(quantity) FROM new_parts
                              WHERE catalog_ref = c.catalog_ref AND status = 'available'), 0)
                  + COALESCE((SELECT SUM(quantity) FROM used_parts
                              WHERE catalog_ref = c.catalog_ref AND status = 'available'), 0)
             FROM catalog_items c
             WHERE c.min_stock > 0
             ORDER BY c.catalog_ref",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter(|(_, _, min_stock, available)| available < min_stock)
            .map(|(catalog_ref, name, min_stock, available)| LowStockAlert {
                catalog_ref,
                name,
                available,
                min_stock,
            })
            .collect())
    }
}

// =============================================================================
// Row Mapping & SQL Helpers
// =============================================================================

/// Column list for a warehouse family. Part and appliance tables share the
/// common columns and differ only in their detail pair.
pub(crate) fn columns(kind: WarehouseKind) -> &'static str {
    if kind.is_parts() {
        "id, catalog_ref, quantity, unit_purchase_cents, unit_sale_cents, status, \
         batch_no, expiry_date, created_at, updated_at"
    } else {
        "id, catalog_ref, quantity, unit_purchase_cents, unit_sale_cents, status, \
         serial_no, source_name, created_at, updated_at"
    }
}

pub(crate) fn row_to_item(kind: WarehouseKind, row: &SqliteRow) -> Result<StockItem, sqlx::Error> {
    let details = if kind.is_parts() {
        StockDetails::Part {
            batch_no: row.try_get("batch_no")?,
            expiry_date: row.try_get("expiry_date")?,
        }
    } else {
        StockDetails::Appliance {
            serial_no: row.try_get("serial_no")?,
            source_name: row.try_get("source_name")?,
        }
    };

    Ok(StockItem {
        id: row.try_get("id")?,
        warehouse: kind,
        catalog_ref: row.try_get("catalog_ref")?,
        quantity: row.try_get("quantity")?,
        unit_purchase_cents: row.try_get("unit_purchase_cents")?,
        unit_sale_cents: row.try_get("unit_sale_cents")?,
        status: row.try_get("status")?,
        details,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) async fn insert_item<'e, E>(executor: E, item: &StockItem) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let kind = item.warehouse;
    let sql = format!(
        "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        kind.table(),
        columns(kind)
    );

    let query = sqlx::query(&sql)
        .bind(&item.id)
        .bind(&item.catalog_ref)
        .bind(item.quantity)
        .bind(item.unit_purchase_cents)
        .bind(item.unit_sale_cents)
        .bind(item.status);

    let query = match &item.details {
        StockDetails::Part {
            batch_no,
            expiry_date,
        } => query.bind(batch_no.clone()).bind(*expiry_date),
        StockDetails::Appliance {
            serial_no,
            source_name,
        } => query.bind(serial_no.clone()).bind(source_name.clone()),
    };

    query
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(executor)
        .await?;
    Ok(())
}

async fn update_item(pool: &SqlitePool, item: &StockItem) -> DbResult<()> {
    let kind = item.warehouse;
    let (col_a, col_b) = if kind.is_parts() {
        ("batch_no", "expiry_date")
    } else {
        ("serial_no", "source_name")
    };
    let sql = format!(
        "UPDATE {} SET catalog_ref = ?2, quantity = ?3, unit_purchase_cents = ?4,
                unit_sale_cents = ?5, status = ?6, {col_a} = ?7, {col_b} = ?8,
                updated_at = ?9
         WHERE id = ?1",
        kind.table()
    );

    let query = sqlx::query(&sql)
        .bind(&item.id)
        .bind(&item.catalog_ref)
        .bind(item.quantity)
        .bind(item.unit_purchase_cents)
        .bind(item.unit_sale_cents)
        .bind(item.status);

    let query = match &item.details {
        StockDetails::Part {
            batch_no,
            expiry_date,
        } => query.bind(batch_no.clone()).bind(*expiry_date),
        StockDetails::Appliance {
            serial_no,
            source_name,
        } => query.bind(serial_no.clone()).bind(source_name.clone()),
    };

    let result = query.bind(item.updated_at).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DbError::not_found("stock item", item.id.clone()));
    }
    Ok(())
}

fn apply_patch(current: &StockItem, patch: StockItemPatch) -> StockItem {
    let mut merged = current.clone();
    if let Some(catalog_ref) = patch.catalog_ref {
        merged.catalog_ref = catalog_ref;
    }
    if let Some(quantity) = patch.quantity {
        merged.quantity = quantity;
    }
    if let Some(price) = patch.unit_purchase_cents {
        merged.unit_purchase_cents = price;
    }
    if let Some(price) = patch.unit_sale_cents {
        merged.unit_sale_cents = price;
    }
    if let Some(status) = patch.status {
        merged.status = status;
    }
    merged.details = match current.details.clone() {
        StockDetails::Part {
            batch_no,
            expiry_date,
        } => StockDetails::Part {
            batch_no: patch.batch_no.or(batch_no),
            expiry_date: patch.expiry_date.or(expiry_date),
        },
        StockDetails::Appliance {
            serial_no,
            source_name,
        } => StockDetails::Appliance {
            serial_no: patch.serial_no.or(serial_no),
            source_name: patch.source_name.or(source_name),
        },
    };
    merged.updated_at = Utc::now();
    merged
}

// =============================================================================
// Unit Tests
// =============================================================================
