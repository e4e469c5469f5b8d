pub mod authors;
pub mod books;

use bookshelf_kernel::ModuleRegistry;
use sqlx::SqlitePool;

/// Register every catalogue module. Order matters: books reference authors.
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool) {
    registry.register(authors::create_module(pool.clone()));
    registry.register(books::create_module(pool.clone()));
}
