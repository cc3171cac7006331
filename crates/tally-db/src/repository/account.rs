//! # Account Store
//!
//! Database operations for accounts.
//!
//! ## Ownership
//! The running balance column belongs to the ledger recorder; nothing in
//! this store touches `current_balance_cents` after creation. Accounts are
//! never physically deleted - deactivation keeps historical ledger entries
//! attributable.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{
    validation::validate_new_account, Account, AccountPatch, ChangeNotifier, EntityKind,
    NewAccount,
};

const ACCOUNT_COLUMNS: &str = "id, number, name, account_type, institution, owner, \
     initial_balance_cents, current_balance_cents, is_active, created_at, updated_at";

/// Repository for account database operations.
#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
    notifier: Arc<dyn ChangeNotifier>,
}

impl AccountStore {
    /// Creates a new AccountStore.
    pub fn new(pool: SqlitePool, notifier: Arc<dyn ChangeNotifier>) -> Self {
        AccountStore { pool, notifier }
    }

    /// Creates an account. The running balance starts equal to the opening
    /// balance; from then on only posted ledger entries move it.
    pub async fn create(&self, spec: NewAccount) -> DbResult<Account> {
        validate_new_account(&spec)?;

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            number: spec.number.trim().to_string(),
            name: spec.name.trim().to_string(),
            account_type: spec.account_type,
            institution: spec.institution,
            owner: spec.owner,
            initial_balance_cents: spec.initial_balance_cents,
            current_balance_cents: spec.initial_balance_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %account.id, number = %account.number, "creating account");

        sqlx::query(
            "INSERT INTO accounts (
                id, number, name, account_type, institution, owner,
                initial_balance_cents, current_balance_cents, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&account.id)
        .bind(&account.number)
        .bind(&account.name)
        .bind(account.account_type)
        .bind(&account.institution)
        .bind(&account.owner)
        .bind(account.initial_balance_cents)
        .bind(account.current_balance_cents)
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        self.notifier.changed(EntityKind::Accounts);
        Ok(account)
    }

    /// Gets an account by ID.
    pub async fn get(&self, id: &str) -> DbResult<Account> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or_else(|| DbError::not_found("account", id))
    }

    /// Gets an account by its business number.
    pub async fn get_by_number(&self, number: &str) -> DbResult<Account> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE number = ?1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        account.ok_or_else(|| DbError::not_found("account", number))
    }

    /// Lists accounts, optionally restricted to active ones.
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Account>> {
        let sql = if active_only {
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE is_active = 1 ORDER BY number")
        } else {
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY number")
        };

        let accounts = sqlx::query_as::<_, Account>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    /// Deactivates an account. The row and its history stay; new ledger
    /// entries referencing it are rejected by the recorder.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query("UPDATE accounts SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("account", id));
        }

        debug!(id = %id, "account deactivated");
        self.notifier.changed(EntityKind::Accounts);
        Ok(())
    }

    /// Patches account metadata (name, institution, owner). Balances are
    /// not reachable through this path. An empty patch is a no-op
    /// returning false.
    pub async fn update_details(&self, id: &str, patch: AccountPatch) -> DbResult<bool> {
        if patch.is_empty() {
            return Ok(false);
        }

        let current = self.get(id).await?;
        let now = Utc::now();

        let name = patch.name.unwrap_or(current.name);
        let institution = patch.institution.or(current.institution);
        let owner = patch.owner.or(current.owner);

        sqlx::query(
            "UPDATE accounts SET name = ?2, institution = ?3, owner = ?4, updated_at = ?5
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&name)
        .bind(&institution)
        .bind(&owner)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.notifier.changed(EntityKind::Accounts);
        Ok(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::AccountType;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn spec(number: &str, opening: i64) -> NewAccount {
        NewAccount {
            number: number.into(),
            name: format!("Account {number}"),
            account_type: AccountType::Current,
            institution: Some("Acme Bank".into()),
            owner: None,
            initial_balance_cents: opening,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let accounts = db.accounts();

        let created = accounts.create(spec("1001", 5000)).await.unwrap();
        assert_eq!(created.current_balance_cents, 5000);
        assert!(created.is_active);

        let fetched = accounts.get(&created.id).await.unwrap();
        assert_eq!(fetched.number, "1001");
        assert_eq!(fetched.initial_balance_cents, 5000);

        let by_number = accounts.get_by_number("1001").await.unwrap();
        assert_eq!(by_number.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let db = test_db().await;
        let accounts = db.accounts();

        accounts.create(spec("1001", 0)).await.unwrap();
        let err = accounts.create(spec("1001", 0)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_negative_opening_balance_rejected() {
        let db = test_db().await;
        let err = db.accounts().create(spec("1001", -1)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
    }

    #[tokio::test]
    async fn test_list_active_only() {
        let db = test_db().await;
        let accounts = db.accounts();

        let a = accounts.create(spec("1001", 0)).await.unwrap();
        accounts.create(spec("1002", 0)).await.unwrap();
        accounts.deactivate(&a.id).await.unwrap();

        assert_eq!(accounts.list(true).await.unwrap().len(), 1);
        assert_eq!(accounts.list(false).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_account() {
        let db = test_db().await;
        let err = db.accounts().deactivate("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_details() {
        let db = test_db().await;
        let accounts = db.accounts();
        let account = accounts.create(spec("1001", 100)).await.unwrap();

        // Empty patch is a no-op.
        let updated = accounts
            .update_details(&account.id, AccountPatch::default())
            .await
            .unwrap();
        assert!(!updated);

        let updated = accounts
            .update_details(
                &account.id,
                AccountPatch {
                    name: Some("Main till".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated);

        let fetched = accounts.get(&account.id).await.unwrap();
        assert_eq!(fetched.name, "Main till");
        // Unpatched fields survive, balances untouched.
        assert_eq!(fetched.institution.as_deref(), Some("Acme Bank"));
        assert_eq!(fetched.current_balance_cents, 100);
    }
}
