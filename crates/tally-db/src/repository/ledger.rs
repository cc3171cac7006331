//! # Ledger Recorder
//!
//! Appends monetary ledger entries and atomically mutates account balances.
//!
//! ## Posting Flow
//! ```text
//! record(kind, from?, to?, amount, ...)
//!      │
//!      ▼
//! 1. VALIDATE     amount > 0, account shape per kind   (no mutation yet)
//!      │
//!      ▼
//! 2. TRANSACTION  check accounts exist, are active, and the debited
//!      │          balance covers the amount (no overdraft, ever)
//!      │          INSERT ledger_entries
//!      │          UPDATE accounts SET balance -= / += amount
//!      ▼
//! 3. COMMIT       both the entry and the balances, or neither
//!      │
//!      ▼
//! 4. NOTIFY       ledger_entries + accounts changed
//! ```
//!
//! Entries are immutable once posted. There is deliberately no update or
//! delete path here; `reverse` posts a compensating entry instead.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{
    validation::validate_new_entry, ChangeNotifier, CoreError, EntityKind, LedgerEntry,
    LedgerFilter, Money, NewLedgerEntry,
};

const ENTRY_COLUMNS: &str =
    "id, kind, from_account, to_account, amount_cents, description, operator, occurred_at";

/// Records monetary movements. The only component that mutates
/// `current_balance_cents`.
#[derive(Clone)]
pub struct LedgerRecorder {
    pool: SqlitePool,
    notifier: Arc<dyn ChangeNotifier>,
}

impl LedgerRecorder {
    /// Creates a new LedgerRecorder.
    pub fn new(pool: SqlitePool, notifier: Arc<dyn ChangeNotifier>) -> Self {
        LedgerRecorder { pool, notifier }
    }

    /// Posts a ledger entry and applies it to the referenced balances as
    /// one atomic unit.
    ///
    /// Fails closed: every precondition is checked before the first write,
    /// and a failure after that aborts the whole transaction.
    pub async fn record(&self, spec: NewLedgerEntry) -> DbResult<LedgerEntry> {
        validate_new_entry(&spec)?;

        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            kind: spec.kind,
            from_account: spec.from_account,
            to_account: spec.to_account,
            amount_cents: spec.amount_cents,
            description: spec.description,
            operator: spec.operator,
            occurred_at: Utc::now(),
        };

        debug!(id = %entry.id, kind = ?entry.kind, amount = entry.amount_cents, "posting ledger entry");

        let mut tx = self.pool.begin().await?;

        // Debited side: must exist, be active, and cover the amount.
        if let Some(from) = &entry.from_account {
            let (balance_cents, is_active) = Self::account_state(&mut tx, from).await?;
            if !is_active {
                return Err(CoreError::AccountInactive(from.clone()).into());
            }
            if Money::from_cents(balance_cents) < entry.amount() {
                return Err(CoreError::InsufficientFunds {
                    account: from.clone(),
                    balance_cents,
                    requested_cents: entry.amount_cents,
                }
                .into());
            }
        }

        // Credited side: must exist and be active.
        if let Some(to) = &entry.to_account {
            let (_, is_active) = Self::account_state(&mut tx, to).await?;
            if !is_active {
                return Err(CoreError::AccountInactive(to.clone()).into());
            }
        }

        sqlx::query(
            "INSERT INTO ledger_entries (
                id, kind, from_account, to_account, amount_cents,
                description, operator, occurred_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&entry.id)
        .bind(entry.kind)
        .bind(&entry.from_account)
        .bind(&entry.to_account)
        .bind(entry.amount_cents)
        .bind(&entry.description)
        .bind(&entry.operator)
        .bind(entry.occurred_at)
        .execute(&mut *tx)
        .await?;

        if let Some(from) = &entry.from_account {
            sqlx::query(
                "UPDATE accounts
                 SET current_balance_cents = current_balance_cents - ?2, updated_at = ?3
                 WHERE id = ?1",
            )
            .bind(from)
            .bind(entry.amount_cents)
            .bind(entry.occurred_at)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(to) = &entry.to_account {
            sqlx::query(
                "UPDATE accounts
                 SET current_balance_cents = current_balance_cents + ?2, updated_at = ?3
                 WHERE id = ?1",
            )
            .bind(to)
            .bind(entry.amount_cents)
            .bind(entry.occurred_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.notifier.changed(EntityKind::LedgerEntries);
        self.notifier.changed(EntityKind::Accounts);
        Ok(entry)
    }

    /// Posts a compensating entry for `entry_id`: accounts swapped, kind
    /// mirrored, description referencing the original. The original entry
    /// is never mutated or removed.
    pub async fn reverse(
        &self,
        entry_id: &str,
        reason: &str,
        operator: &str,
    ) -> DbResult<LedgerEntry> {
        let original = self.get(entry_id).await?;

        let spec = NewLedgerEntry {
            kind: original.kind.reversed(),
            from_account: original.to_account,
            to_account: original.from_account,
            amount_cents: original.amount_cents,
            description: Some(format!("reversal of entry {entry_id}: {reason}")),
            operator: operator.to_string(),
        };

        self.record(spec).await
    }

    /// Gets an entry by ID.
    pub async fn get(&self, id: &str) -> DbResult<LedgerEntry> {
        let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        entry.ok_or_else(|| DbError::not_found("ledger entry", id))
    }

    /// Lists entries, newest first, optionally filtered by account, kind
    /// and time range.
    pub async fn list(&self, filter: LedgerFilter) -> DbResult<Vec<LedgerEntry>> {
        let mut sql = format!("SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE 1=1");
        if filter.account.is_some() {
            sql.push_str(" AND (from_account = ? OR to_account = ?)");
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

        let mut query = sqlx::query_as::<_, LedgerEntry>(&sql);
        if let Some(account) = &filter.account {
            query = query.bind(account.clone()).bind(account.clone());
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

    /// Re-derives an account balance from its entry history:
    /// `initial + sum(credits) - sum(debits)`. Between operations this must
    /// equal the stored running balance; the integrity check behind the
    /// ledger.
    pub async fn computed_balance(&self, account_id: &str) -> DbResult<i64> {
        let initial: Option<i64> =
            sqlx::query_scalar("SELECT initial_balance_cents FROM accounts WHERE id = ?1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
        let initial = initial.ok_or_else(|| DbError::not_found("account", account_id))?;

        let credits: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM ledger_entries WHERE to_account = ?1",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        let debits: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM ledger_entries WHERE from_account = ?1",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(initial + credits - debits)
    }

    /// Balance and active flag of an account, read inside the posting
    /// transaction so the no-overdraft check and the debit see the same
    /// state.
    async fn account_state(
        tx: &mut Transaction<'_, Sqlite>,
        account_id: &str,
    ) -> DbResult<(i64, bool)> {
        let row = sqlx::query_as::<_, (i64, bool)>(
            "SELECT current_balance_cents, is_active FROM accounts WHERE id = ?1",
        )
        .bind(account_id)
        .fetch_optional(&mut **tx)
        .await?;

        row.ok_or_else(|| DbError::not_found("account", account_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::{AccountType, LedgerEntryKind, NewAccount, ValidationError};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn account(db: &Database, number: &str, opening: i64) -> String {
        db.accounts()
            .create(NewAccount {
                number: number.into(),
                name: format!("Account {number}"),
                account_type: AccountType::Current,
                institution: None,
                owner: None,
                initial_balance_cents: opening,
            })
            .await
            .unwrap()
            .id
    }

    fn payment(from: &str, amount: i64) -> NewLedgerEntry {
        NewLedgerEntry {
            kind: LedgerEntryKind::Payment,
            from_account: Some(from.into()),
            to_account: None,
            amount_cents: amount,
            description: None,
            operator: "tester".into(),
        }
    }

    fn receipt(to: &str, amount: i64) -> NewLedgerEntry {
        NewLedgerEntry {
            kind: LedgerEntryKind::Receipt,
            from_account: None,
            to_account: Some(to.into()),
            amount_cents: amount,
            description: None,
            operator: "tester".into(),
        }
    }

    fn transfer(from: &str, to: &str, amount: i64) -> NewLedgerEntry {
        NewLedgerEntry {
            kind: LedgerEntryKind::Transfer,
            from_account: Some(from.into()),
            to_account: Some(to.into()),
            amount_cents: amount,
            description: None,
            operator: "tester".into(),
        }
    }

    async fn balance(db: &Database, id: &str) -> i64 {
        db.accounts().get(id).await.unwrap().current_balance_cents
    }

    #[tokio::test]
    async fn test_balances_follow_entries() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 1000).await;
        let b = account(&db, "1002", 0).await;

        // After every successful call the stored balance must equal the
        // recomputed one for both accounts.
        let calls = [
            receipt(&a, 500),
            payment(&a, 300),
            transfer(&a, &b, 700),
            receipt(&b, 50),
            payment(&b, 600),
        ];
        for call in calls {
            ledger.record(call).await.unwrap();
            for id in [&a, &b] {
                let stored = balance(&db, id).await;
                let derived = ledger.computed_balance(id).await.unwrap();
                assert_eq!(stored, derived);
            }
        }

        assert_eq!(balance(&db, &a).await, 1000 + 500 - 300 - 700);
        assert_eq!(balance(&db, &b).await, 700 + 50 - 600);
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected_without_mutation() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 1000).await;

        for amount in [0, -5] {
            let err = ledger.record(payment(&a, amount)).await.unwrap_err();
            assert!(matches!(
                err,
                DbError::Domain(CoreError::Validation(ValidationError::MustBePositive { .. }))
            ));
        }

        assert_eq!(balance(&db, &a).await, 1000);
        assert!(ledger.list(LedgerFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_overdraft() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 1000).await;

        let err = ledger.record(payment(&a, 1500)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientFunds { .. })
        ));

        // No entry, no balance change.
        assert_eq!(balance(&db, &a).await, 1000);
        assert!(ledger.list(LedgerFilter::default()).await.unwrap().is_empty());

        // A covered payment then goes through.
        ledger.record(payment(&a, 400)).await.unwrap();
        assert_eq!(balance(&db, &a).await, 600);
    }

    #[tokio::test]
    async fn test_transfer_would_overdraw() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 100).await;
        let b = account(&db, "1002", 0).await;

        let err = ledger.record(transfer(&a, &b, 200)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientFunds { .. })
        ));
        assert_eq!(balance(&db, &a).await, 100);
        assert_eq!(balance(&db, &b).await, 0);
    }

    #[tokio::test]
    async fn test_inactive_account_is_rejected() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 1000).await;
        db.accounts().deactivate(&a).await.unwrap();

        let err = ledger.record(payment(&a, 100)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::AccountInactive(_))
        ));
        assert_eq!(balance(&db, &a).await, 1000);
    }

    #[tokio::test]
    async fn test_unknown_account_is_rejected() {
        let db = test_db().await;
        let err = db
            .ledger()
            .record(payment("no-such-account", 100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reverse_restores_balances_and_keeps_original() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 1000).await;
        let b = account(&db, "1002", 500).await;

        let original = ledger.record(transfer(&a, &b, 250)).await.unwrap();
        assert_eq!(balance(&db, &a).await, 750);
        assert_eq!(balance(&db, &b).await, 750);

        let reversal = ledger.reverse(&original.id, "keyed wrong", "tester").await.unwrap();
        assert_eq!(reversal.kind, LedgerEntryKind::Transfer);
        assert_eq!(reversal.from_account.as_deref(), Some(b.as_str()));
        assert_eq!(reversal.to_account.as_deref(), Some(a.as_str()));
        assert!(reversal
            .description
            .as_deref()
            .unwrap()
            .contains(&original.id));

        // Balances back where they started, derived from the full history.
        assert_eq!(balance(&db, &a).await, 1000);
        assert_eq!(balance(&db, &b).await, 500);
        assert_eq!(ledger.computed_balance(&a).await.unwrap(), 1000);

        // The original entry is untouched and both entries exist.
        let kept = ledger.get(&original.id).await.unwrap();
        assert_eq!(kept.amount_cents, 250);
        assert_eq!(
            ledger.list(LedgerFilter::default()).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_reverse_payment_becomes_receipt() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 1000).await;

        let original = ledger.record(payment(&a, 400)).await.unwrap();
        assert_eq!(balance(&db, &a).await, 600);

        let reversal = ledger.reverse(&original.id, "refunded", "tester").await.unwrap();
        assert_eq!(reversal.kind, LedgerEntryKind::Receipt);
        assert_eq!(reversal.to_account.as_deref(), Some(a.as_str()));
        assert_eq!(balance(&db, &a).await, 1000);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = test_db().await;
        let ledger = db.ledger();
        let a = account(&db, "1001", 1000).await;
        let b = account(&db, "1002", 1000).await;

        ledger.record(payment(&a, 100)).await.unwrap();
        ledger.record(receipt(&b, 200)).await.unwrap();
        ledger.record(transfer(&a, &b, 50)).await.unwrap();

        let for_a = ledger
            .list(LedgerFilter {
                account: Some(a.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(for_a.len(), 2);

        let payments = ledger
            .list(LedgerFilter {
                kind: Some(LedgerEntryKind::Payment),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(payments.len(), 1);
    }
}
