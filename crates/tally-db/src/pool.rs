//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers, writers don't block readers
//! - Better crash recovery
//!
//! Writes remain serialized by SQLite itself, which is exactly the "single
//! logical writer per operation" model the engine assumes.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use tally_core::{ChangeNotifier, NullNotifier};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::account::AccountStore;
use crate::repository::catalog::CatalogReader;
use crate::repository::deletion::DeletionLog;
use crate::repository::inventory_log::InventoryLogRecorder;
use crate::repository::ledger::LedgerRecorder;
use crate::repository::stock::WarehouseStore;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/tally.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a local single-writer engine)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing access to the engine components.
///
/// Each accessor hands out a cheap clone-of-pool repository. The change
/// notifier is injected here and threaded into every mutating component -
/// explicit dependency wiring, no process-wide singletons.
#[derive(Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Observer seam shared by all mutating components.
    notifier: Arc<dyn ChangeNotifier>,
}

impl Database {
    /// Creates a new database with no observers wired up.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL mode, NORMAL synchronous, foreign keys on
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        Self::with_notifier(config, Arc::new(NullNotifier)).await
    }

    /// Creates a new database with the given change notifier.
    pub async fn with_notifier(
        config: DbConfig,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "initializing database connection"
        );

        // sqlite://path creates file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            // WAL mode: readers don't block writers and vice versa
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the last
            // transaction on power loss
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off for backwards compatibility
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "database pool created"
        );

        let db = Database { pool, notifier };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent; automatically called by the
    /// constructors unless disabled in the config.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool, for advanced queries not
    /// covered by the repositories. Prefer repository methods.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The account store.
    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(self.pool.clone(), self.notifier.clone())
    }

    /// The monetary ledger recorder.
    pub fn ledger(&self) -> LedgerRecorder {
        LedgerRecorder::new(self.pool.clone(), self.notifier.clone())
    }

    /// The warehouse stock store.
    pub fn warehouse(&self) -> WarehouseStore {
        WarehouseStore::new(self.pool.clone(), self.notifier.clone())
    }

    /// The inventory audit-trail recorder.
    pub fn inventory_log(&self) -> InventoryLogRecorder {
        InventoryLogRecorder::new(self.pool.clone(), self.notifier.clone())
    }

    /// The deletion audit log.
    pub fn deletions(&self) -> DeletionLog {
        DeletionLog::new(self.pool.clone(), self.notifier.clone())
    }

    /// The read-only catalog lookup.
    pub fn catalog(&self) -> CatalogReader {
        CatalogReader::new(self.pool.clone())
    }

    /// Closes the database connection pool. After this, all repository
    /// operations fail.
    pub async fn close(&self) {
        info!("closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("pool", &self.pool).finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
