use anyhow::Context;
use bookshelf_kernel::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about = "Authors and books catalogue service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Replace the catalogue with the sample authors and books
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().context("failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => bookshelf_app::serve(&settings).await,
        Command::Migrate => {
            let pool = bookshelf_db::connect(&settings.database).await?;
            let applied = bookshelf_app::migrate(&pool).await?;
            tracing::info!(applied, "migrations complete");
            pool.close().await;
            Ok(())
        }
        Command::Seed => {
            let pool = bookshelf_db::connect(&settings.database).await?;
            bookshelf_app::migrate(&pool).await?;
            let summary = bookshelf_app::seed::seed(&pool).await?;
            tracing::info!(
                authors = summary.authors,
                books = summary.books,
                "database seeding completed"
            );
            pool.close().await;
            Ok(())
        }
    }
}
