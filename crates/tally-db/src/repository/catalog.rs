//! # Catalog Reader
//!
//! Read-only lookup into the external part/device catalog.
//!
//! The catalog (display names, brands, `min_stock` thresholds) is owned and
//! written by an external system; this engine only ever reads it. There is
//! deliberately no insert/update/delete here.

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use tally_core::CatalogItem;

const CATALOG_COLUMNS: &str = "catalog_ref, name, brand, min_stock";

/// Read-only repository over `catalog_items`.
#[derive(Debug, Clone)]
pub struct CatalogReader {
    pool: SqlitePool,
}

impl CatalogReader {
    /// Creates a new CatalogReader.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogReader { pool }
    }

    /// Gets a catalog entry by reference.
    pub async fn get(&self, catalog_ref: &str) -> DbResult<CatalogItem> {
        let item = sqlx::query_as::<_, CatalogItem>(&format!(
            "SELECT {CATALOG_COLUMNS} FROM catalog_items WHERE catalog_ref = ?1"
        ))
        .bind(catalog_ref)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("catalog item", catalog_ref))
    }

    /// Lists the whole catalog, ordered by reference.
    pub async fn list(&self) -> DbResult<Vec<CatalogItem>> {
        let items = sqlx::query_as::<_, CatalogItem>(&format!(
            "SELECT {CATALOG_COLUMNS} FROM catalog_items ORDER BY catalog_ref"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Seeded the way the owning external system would write it.
        sqlx::query(
            "INSERT INTO catalog_items (catalog_ref, name, brand, min_stock)
             VALUES ('PRT-100', 'Compressor relay', 'Acme', 5)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let item = db.catalog().get("PRT-100").await.unwrap();
        assert_eq!(item.name, "Compressor relay");
        assert_eq!(item.min_stock, 5);

        assert_eq!(db.catalog().list().await.unwrap().len(), 1);

        let err = db.catalog().get("PRT-404").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
