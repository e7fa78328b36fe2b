use crate::cli::utils::output_success;
use crate::cli::CliContext;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Runs against `DATABASE_URL` directly; no server involved.
pub async fn handle(ctx: &CliContext) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;
    output_success(&ctx.output, "Database migrations applied", None)
}
