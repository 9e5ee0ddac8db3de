//! Database connection and pool management.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Embedded migrations that are run automatically on connect.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// Indexing is strictly sequential and the session is explicitly not shared
// across concurrent walks, so one writer connection is the whole story.
const MAX_CONNECTIONS: u32 = 1;

/// Connection pool for the catalog database.
///
/// This is the shared persistence session of one indexing run: created once,
/// handed to the [`Repository`](crate::Repository), and closed when the walk
/// finishes.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn new(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Connect to the catalog database at the given path.
    ///
    /// Creates the database file if it doesn't exist and runs migrations.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = Self::base_options().filename(path.as_ref()).create_if_missing(true);
        Self::new(options).await
    }

    /// Connect to an in-memory database (useful for testing).
    ///
    /// Note:
    /// - In-memory databases are destroyed when the connection closes.
    /// - Not gated behind `#[cfg(test)]` so that other crates can use this
    ///   in their tests too.
    pub async fn connect_in_memory() -> Result<Self> {
        Self::new(Self::base_options().filename(":memory:")).await
    }

    /// Base connection options shared between file and in-memory databases.
    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            // WAL keeps already-committed files durable if the walk is
            // interrupted partway through a batch.
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            // Foreign key enforcement for the link tables
            .foreign_keys(true)
            // PRAGMA synchronous = NORMAL (safe with WAL, much faster)
            .synchronous(SqliteSynchronous::Normal)
            // PRAGMA busy_timeout = 1500ms, in case another process holds
            // the catalog open (the interactive browser, for example)
            .busy_timeout(std::time::Duration::from_millis(1500))
    }

    /// Run database migrations.
    ///
    /// Called automatically by [`connect`](Self::connect) and
    /// [`connect_in_memory`](Self::connect_in_memory); idempotent.
    #[instrument(name = "performing database migrations", skip(self))]
    async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    ///
    /// Waits for the connection to be returned and then closes it. The
    /// `Database` should not be used afterwards.
    pub async fn close(&self) {
        // Let SQLite update query planner statistics
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
    }
}
