//! Authors and books catalogue service.
//!
//! Wires the catalogue modules into the kernel registry and drives their
//! lifecycle around the HTTP server.

use anyhow::Context;
use bookshelf_kernel::{InitCtx, ModuleRegistry, Settings};
use sqlx::SqlitePool;

pub mod modules;
pub mod seed;

/// Registry holding every catalogue module, backed by `pool`.
pub fn registry(pool: &SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

/// Apply pending schema migrations. Returns how many were applied.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<usize> {
    let migrations = registry(pool).collect_migrations();
    bookshelf_db::run_migrations(pool, &migrations).await
}

/// Open the configured database and build the module registry, migrating
/// first when `database.auto_migrate` is set.
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<(SqlitePool, ModuleRegistry)> {
    let pool = bookshelf_db::connect(&settings.database).await?;

    if settings.database.auto_migrate {
        let applied = migrate(&pool).await.context("auto-migration failed")?;
        tracing::info!(applied, "schema up to date");
    }

    let registry = registry(&pool);
    Ok((pool, registry))
}

/// Run the service until a shutdown signal arrives.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let (pool, registry) = bootstrap(settings).await?;
    let ctx = InitCtx { settings };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, settings).await;

    registry.stop_modules().await?;
    pool.close().await;

    served
}
