//! Sample catalogue for local development.

use anyhow::Context;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::modules::authors::{models::CreateAuthor, store::AuthorStore};
use crate::modules::books::{models::CreateBook, store::BookStore};

const AUTHORS: &[(&str, &str)] = &[
    ("George R.R.", "Martin"),
    ("Jane", "Austen"),
    ("Stephen", "King"),
    ("Agatha", "Christie"),
];

/// `(title, index into AUTHORS, page count, release date)`
const BOOKS: &[(&str, usize, i64, (i32, u32, u32))] = &[
    ("A Game of Thrones", 0, 694, (1996, 8, 1)),
    ("A Clash of Kings", 0, 768, (1998, 11, 16)),
    ("Pride and Prejudice", 1, 432, (1813, 1, 28)),
    ("The Shining", 2, 447, (1977, 1, 28)),
    ("It", 2, 1138, (1986, 9, 15)),
    ("Murder on the Orient Express", 3, 256, (1934, 1, 1)),
    ("And Then There Were None", 3, 272, (1939, 11, 6)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub authors: usize,
    pub books: usize,
}

/// Wipe both tables and insert the sample catalogue.
///
/// Rows go through the stores so they get the same ids and timestamps as
/// rows created over HTTP.
pub async fn seed(pool: &SqlitePool) -> anyhow::Result<SeedSummary> {
    tracing::info!("clearing catalogue");
    sqlx::query("DELETE FROM books")
        .execute(pool)
        .await
        .context("failed to clear books")?;
    sqlx::query("DELETE FROM authors")
        .execute(pool)
        .await
        .context("failed to clear authors")?;

    let authors = AuthorStore::new(pool.clone());
    let books = BookStore::new(pool.clone());

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for (first_name, last_name) in AUTHORS {
        let author = authors
            .create(CreateAuthor {
                first_name: (*first_name).to_string(),
                last_name: (*last_name).to_string(),
            })
            .await
            .with_context(|| format!("failed to seed author {first_name} {last_name}"))?;
        author_ids.push(author.id);
    }

    for (title, author, page_count, (year, month, day)) in BOOKS {
        let release_date = NaiveDate::from_ymd_opt(*year, *month, *day)
            .with_context(|| format!("invalid release date for '{title}'"))?;
        let author_id = *author_ids
            .get(*author)
            .with_context(|| format!("no seeded author #{author} for '{title}'"))?;

        books
            .create(CreateBook {
                title: (*title).to_string(),
                author_id,
                page_count: *page_count,
                release_date,
            })
            .await
            .with_context(|| format!("failed to seed book '{title}'"))?;
    }

    let summary = SeedSummary {
        authors: AUTHORS.len(),
        books: BOOKS.len(),
    };
    tracing::info!(authors = summary.authors, books = summary.books, "catalogue seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_db::PageRequest;

    async fn migrated_pool() -> SqlitePool {
        let pool = bookshelf_db::connect_in_memory().await.unwrap();
        crate::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn seeding_twice_replaces_the_catalogue() {
        let pool = migrated_pool().await;

        let first = seed(&pool).await.unwrap();
        let second = seed(&pool).await.unwrap();
        assert_eq!(first, second);

        let authors = AuthorStore::new(pool.clone());
        let books = BookStore::new(pool);
        assert_eq!(authors.count().await.unwrap(), 4);
        assert_eq!(books.count().await.unwrap(), 7);

        let page = authors.list(PageRequest::new(0, 10).resolve()).await.unwrap();
        let king = page
            .items
            .iter()
            .find(|author| author.last_name == "King")
            .unwrap();
        let titles: Vec<_> = king.books.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, ["The Shining", "It"]);
    }
}
