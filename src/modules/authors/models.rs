use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::books::models::BookRecord;

/// Persisted author row.
///
/// Also embedded as the `author` of every book response.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRecord {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: Uuid,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An author together with the books they wrote.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub books: Vec<BookRecord>,
}

impl Author {
    pub fn from_record(record: AuthorRecord, books: Vec<BookRecord>) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            created_at: record.created_at,
            updated_at: record.updated_at,
            books,
        }
    }
}

/// Request body for creating an author.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthor {
    /// The first name of the author
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "John")]
    pub first_name: String,
    /// The last name of the author
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Doe")]
    pub last_name: String,
}

impl CreateAuthor {
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> AuthorRecord {
        AuthorRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
}

impl UpdateAuthor {
    /// Apply the supplied fields on top of `record`, stamping `updated_at`.
    pub fn merge(self, record: AuthorRecord, now: DateTime<Utc>) -> AuthorRecord {
        AuthorRecord {
            first_name: self.first_name.unwrap_or(record.first_name),
            last_name: self.last_name.unwrap_or(record.last_name),
            updated_at: now,
            ..record
        }
    }
}
