//! Database access for bookshelf: connection pool, module migrations,
//! pagination and the error type shared by record stores.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

pub mod migrate;
pub mod pagination;

pub use migrate::run_migrations;
pub use pagination::{Page, PageMeta, PageRequest, PageWindow};

/// Errors surfaced by record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a transaction that takes the write lock up front (`BEGIN IMMEDIATE`).
///
/// Use it for read-then-write sequences. A deferred transaction that reads
/// first and upgrades later fails with `SQLITE_BUSY` when another connection
/// upgrades at the same time; an immediate one waits for the lock instead.
pub async fn begin_write(pool: &SqlitePool) -> StoreResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Open a connection pool for the configured database.
///
/// Foreign keys are enforced on every connection. File databases run in WAL
/// mode so readers do not block the single writer.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    tracing::info!(
        target: "bookshelf-db",
        url = %settings.url,
        max_connections = settings.max_connections,
        "database pool ready"
    );

    Ok(pool)
}

/// Open a private in-memory database backed by a single connection.
///
/// The database lives as long as the pool's connection, so the pool keeps it
/// open indefinitely.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory database")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_pool_enforces_foreign_keys() {
        let pool = connect_in_memory().await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn write_transaction_commits() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query("CREATE TABLE shelves (label TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();

        let mut tx = begin_write(&pool).await.unwrap();
        sqlx::query("INSERT INTO shelves (label) VALUES ('a')")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shelves")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn not_found_message_names_entity() {
        let id = Uuid::nil();
        let err = StoreError::not_found("Author", id);
        assert_eq!(
            err.to_string(),
            "Author with ID 00000000-0000-0000-0000-000000000000 not found"
        );
    }
}
