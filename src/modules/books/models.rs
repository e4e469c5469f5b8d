use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::authors::models::AuthorRecord;

/// Persisted book row.
///
/// Also embedded in the `books` list of every author response.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: Uuid,
    #[schema(example = "The Great Gatsby")]
    pub title: String,
    #[schema(example = 300)]
    pub page_count: i64,
    #[schema(example = "2023-01-01")]
    pub release_date: NaiveDate,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A book together with its author.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub page_count: i64,
    pub release_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorRecord,
}

impl Book {
    pub fn from_parts(record: BookRecord, author: AuthorRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            page_count: record.page_count,
            release_date: record.release_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
            author,
        }
    }
}

/// A `books` row joined with its `authors` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BookJoinRow {
    #[sqlx(flatten)]
    pub book: BookRecord,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_created_at: DateTime<Utc>,
    pub author_updated_at: DateTime<Utc>,
}

impl BookJoinRow {
    pub fn into_book(self) -> Book {
        let author = AuthorRecord {
            id: self.book.author_id,
            first_name: self.author_first_name,
            last_name: self.author_last_name,
            created_at: self.author_created_at,
            updated_at: self.author_updated_at,
        };
        Book::from_parts(self.book, author)
    }
}

/// Request body for creating a book.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    /// The title of the book
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    /// The UUID of the author
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub author_id: Uuid,
    /// The number of pages in the book
    #[validate(range(min = 1))]
    #[schema(example = 300)]
    pub page_count: i64,
    /// The release date of the book
    #[schema(example = "2023-01-01")]
    pub release_date: NaiveDate,
}

impl CreateBook {
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> BookRecord {
        BookRecord {
            id,
            title: self.title,
            page_count: self.page_count,
            release_date: self.release_date,
            author_id: self.author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    /// Move the book to another (existing) author
    pub author_id: Option<Uuid>,
    #[validate(range(min = 1))]
    pub page_count: Option<i64>,
    pub release_date: Option<NaiveDate>,
}

impl UpdateBook {
    /// Apply the supplied fields on top of `record`, stamping `updated_at`.
    ///
    /// The caller is responsible for checking that a new `author_id` exists.
    pub fn merge(self, record: BookRecord, now: DateTime<Utc>) -> BookRecord {
        BookRecord {
            title: self.title.unwrap_or(record.title),
            page_count: self.page_count.unwrap_or(record.page_count),
            release_date: self.release_date.unwrap_or(record.release_date),
            author_id: self.author_id.unwrap_or(record.author_id),
            updated_at: now,
            ..record
        }
    }
}
