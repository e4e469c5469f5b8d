//! Book record store.

use std::collections::HashMap;

use bookshelf_db::{Page, PageWindow, StoreError, StoreResult};
use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{Book, BookJoinRow, BookRecord, CreateBook, UpdateBook};
use crate::modules::authors::store::AuthorStore;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, page_count, release_date, author_id, created_at, updated_at";

/// Books joined with their author, author columns prefixed with `author_`.
const JOINED: &str = "SELECT b.id, b.title, b.page_count, b.release_date, b.author_id, \
                             b.created_at, b.updated_at, \
                             a.first_name AS author_first_name, \
                             a.last_name AS author_last_name, \
                             a.created_at AS author_created_at, \
                             a.updated_at AS author_updated_at \
                      FROM books b JOIN authors a ON a.id = b.author_id";

const ENTITY: &str = "Book";

/// CRUD over the `books` table; reads eagerly load the owning author.
#[derive(Debug, Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of books.
    pub async fn count(&self) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    /// One page of books, oldest first, each with its author.
    pub async fn list(&self, window: PageWindow) -> StoreResult<Page<Book>> {
        let total = self.count().await?;

        let query = format!("{JOINED} ORDER BY b.created_at, b.id LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, BookJoinRow>(&query)
            .bind(window.sql_limit())
            .bind(window.sql_offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(BookJoinRow::into_book).collect();
        Ok(window.into_page(items, total))
    }

    /// Fetch a book with its author.
    pub async fn get(&self, id: Uuid) -> StoreResult<Book> {
        let query = format!("{JOINED} WHERE b.id = ?");
        sqlx::query_as::<_, BookJoinRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(BookJoinRow::into_book)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Insert a book for an existing author.
    ///
    /// The author lookup and the insert share one transaction, so the author
    /// cannot disappear in between. Nothing is written if the author is absent.
    pub async fn create(&self, input: CreateBook) -> StoreResult<Book> {
        let mut tx = bookshelf_db::begin_write(&self.pool).await?;

        let author = AuthorStore::resolve(&mut *tx, input.author_id).await?;
        let record = input.into_record(Uuid::now_v7(), Utc::now());

        let query = format!("INSERT INTO books ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)");
        sqlx::query(&query)
            .bind(record.id)
            .bind(&record.title)
            .bind(record.page_count)
            .bind(record.release_date)
            .bind(record.author_id)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(book_id = %record.id, author_id = %author.id, "book created");
        Ok(Book::from_parts(record, author))
    }

    /// Apply a partial update, possibly moving the book to another author.
    ///
    /// Fails with `NotFound` if the book or the new author is absent; in the
    /// latter case the stored author reference is left untouched.
    pub async fn update(&self, id: Uuid, patch: UpdateBook) -> StoreResult<Book> {
        let mut tx = bookshelf_db::begin_write(&self.pool).await?;

        let existing = Self::resolve(&mut *tx, id).await?;
        let author_id = patch.author_id.unwrap_or(existing.author_id);
        let author = AuthorStore::resolve(&mut *tx, author_id).await?;

        let record = patch.merge(existing, Utc::now());

        sqlx::query(
            "UPDATE books SET title = ?, page_count = ?, release_date = ?, author_id = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(&record.title)
        .bind(record.page_count)
        .bind(record.release_date)
        .bind(record.author_id)
        .bind(record.updated_at)
        .bind(record.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(book_id = %id, author_id = %author.id, "book updated");
        Ok(Book::from_parts(record, author))
    }

    /// Remove a book. Fails with `NotFound` if it does not exist.
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(ENTITY, id));
        }

        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    /// Load the bare book row, failing with `NotFound` if it does not exist.
    pub async fn resolve<'e, E>(executor: E, id: Uuid) -> StoreResult<BookRecord>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = ?");
        sqlx::query_as::<_, BookRecord>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }
}

/// Books of the given authors, grouped by author id, oldest first.
pub(crate) async fn records_for_authors(
    pool: &SqlitePool,
    author_ids: &[Uuid],
) -> StoreResult<HashMap<Uuid, Vec<BookRecord>>> {
    let mut grouped: HashMap<Uuid, Vec<BookRecord>> = HashMap::new();
    if author_ids.is_empty() {
        return Ok(grouped);
    }

    let mut query = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COLUMNS} FROM books WHERE author_id IN ("
    ));
    let mut ids = query.separated(", ");
    for id in author_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY created_at, id");

    let records = query
        .build_query_as::<BookRecord>()
        .fetch_all(pool)
        .await?;

    for record in records {
        grouped.entry(record.author_id).or_default().push(record);
    }

    Ok(grouped)
}
