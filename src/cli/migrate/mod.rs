//! Migrate command - applies PostgreSQL migrations and exits

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{connect_pool, run_storage_migrations, PostgresMigrator};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let pg_config = crate::postgres_config(&config)
        .context("storage.url or DATABASE_URL is required to run migrations")?;

    let pool = connect_pool(&pg_config).await?;
    let applied = run_storage_migrations(&pool).await?;

    let version = PostgresMigrator::new(pool).current_version().await?;
    info!(applied, version = ?version, "Database schema is up to date");

    Ok(())
}
