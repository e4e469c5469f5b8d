pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

use store::AuthorStore;

/// Authors catalogue, mounted under `/api/authors`.
pub struct AuthorsModule {
    store: AuthorStore,
}

impl AuthorsModule {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            store: AuthorStore::new(pool),
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ctx.settings.environment.as_str(),
            "authors module initialized"
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
            id: "001_create_authors",
            up: r#"
                CREATE TABLE authors (
                    id         BLOB PRIMARY KEY NOT NULL,
                    first_name TEXT NOT NULL CHECK (length(first_name) BETWEEN 1 AND 255),
                    last_name  TEXT NOT NULL CHECK (length(last_name) BETWEEN 1 AND 255),
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX authors_created_at_idx ON authors (created_at, id);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let total = self.store.count().await?;
        tracing::info!(module = self.name(), authors = total, "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(pool))
}
