//! Author record store.

use bookshelf_db::{Page, PageWindow, StoreError, StoreResult};
use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{Author, AuthorRecord, CreateAuthor, UpdateAuthor};
use crate::modules::books::store::records_for_authors;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, created_at, updated_at";

const ENTITY: &str = "Author";

/// CRUD over the `authors` table; reads eagerly load each author's books.
#[derive(Debug, Clone)]
pub struct AuthorStore {
    pool: SqlitePool,
}

impl AuthorStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of authors.
    pub async fn count(&self) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    /// One page of authors, oldest first, each with their books.
    pub async fn list(&self, window: PageWindow) -> StoreResult<Page<Author>> {
        let total = self.count().await?;

        let query = format!("SELECT {COLUMNS} FROM authors ORDER BY created_at, id LIMIT ? OFFSET ?");
        let records = sqlx::query_as::<_, AuthorRecord>(&query)
            .bind(window.sql_limit())
            .bind(window.sql_offset())
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
        let mut books = records_for_authors(&self.pool, &ids).await?;

        let items = records
            .into_iter()
            .map(|record| {
                let owned = books.remove(&record.id).unwrap_or_default();
                Author::from_record(record, owned)
            })
            .collect();

        Ok(window.into_page(items, total))
    }

    /// Fetch an author with their books.
    pub async fn get(&self, id: Uuid) -> StoreResult<Author> {
        let record = Self::resolve(&self.pool, id).await?;
        self.with_books(record).await
    }

    pub async fn create(&self, input: CreateAuthor) -> StoreResult<Author> {
        let record = input.into_record(Uuid::now_v7(), Utc::now());

        let query = format!("INSERT INTO authors ({COLUMNS}) VALUES (?, ?, ?, ?, ?)");
        sqlx::query(&query)
            .bind(record.id)
            .bind(&record.first_name)
            .bind(&record.last_name)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await?;

        tracing::info!(author_id = %record.id, "author created");
        Ok(Author::from_record(record, Vec::new()))
    }

    /// Apply a partial update. Fails with `NotFound` if the author is absent.
    pub async fn update(&self, id: Uuid, patch: UpdateAuthor) -> StoreResult<Author> {
        let mut tx = bookshelf_db::begin_write(&self.pool).await?;

        let existing = Self::resolve(&mut *tx, id).await?;
        let record = patch.merge(existing, Utc::now());

        sqlx::query("UPDATE authors SET first_name = ?, last_name = ?, updated_at = ? WHERE id = ?")
            .bind(&record.first_name)
            .bind(&record.last_name)
            .bind(record.updated_at)
            .bind(record.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(author_id = %id, "author updated");
        self.with_books(record).await
    }

    /// Remove an author.
    ///
    /// Authors still referenced by books are kept and the call fails with
    /// `Conflict`; delete or reassign the books first.
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut tx = bookshelf_db::begin_write(&self.pool).await?;

        Self::resolve(&mut *tx, id).await?;

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if books > 0 {
            return Err(StoreError::Conflict(format!(
                "Author with ID {id} still has {books} book(s)"
            )));
        }

        sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(author_id = %id, "author deleted");
        Ok(())
    }

    /// Load the bare author row, failing with `NotFound` if it does not exist.
    ///
    /// Takes any executor so callers can resolve inside their own transaction.
    pub async fn resolve<'e, E>(executor: E, id: Uuid) -> StoreResult<AuthorRecord>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM authors WHERE id = ?");
        sqlx::query_as::<_, AuthorRecord>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    async fn with_books(&self, record: AuthorRecord) -> StoreResult<Author> {
        let books = records_for_authors(&self.pool, &[record.id])
            .await?
            .remove(&record.id)
            .unwrap_or_default();
        Ok(Author::from_record(record, books))
    }
}
