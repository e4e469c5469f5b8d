use anyhow::Context;
use bookshelf_kernel::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = settings.environment.as_str(),
        db = %settings.database.url,
        "bookshelf starting"
    );

    bookshelf_app::serve(&settings).await
}
