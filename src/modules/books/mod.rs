pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

use store::BookStore;

/// Books catalogue, mounted under `/api/books`.
///
/// Depends on the `authors` table, so it must be registered after the
/// authors module.
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            store: BookStore::new(pool),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ctx.settings.environment.as_str(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let (router, _) = routes::router(self.store.clone()).split_for_parts();
        router
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let (_, api) = routes::router(self.store.clone()).split_for_parts();
        serde_json::to_value(api).ok()
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE books (
                    id           BLOB PRIMARY KEY NOT NULL,
                    title        TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 500),
                    page_count   INTEGER NOT NULL CHECK (page_count > 0),
                    release_date TEXT NOT NULL,
                    author_id    BLOB NOT NULL REFERENCES authors (id) ON DELETE RESTRICT,
                    created_at   TEXT NOT NULL,
                    updated_at   TEXT NOT NULL
                );
                CREATE INDEX books_author_id_idx ON books (author_id);
                CREATE INDEX books_created_at_idx ON books (created_at, id);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let total = self.store.count().await?;
        tracing::info!(module = self.name(), books = total, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(pool))
}
