use anyhow::Context;
use tracing_subscriber::EnvFilter;

use folio_api::app::spawn_session_audit;
use folio_api::config::config;
use folio_api::database::DatabaseManager;
use folio_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio_api=info,tower_http=info")),
        )
        .init();

    let config = config().clone();
    tracing::info!("Starting Folio API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }
    if folio_api::is_production!() && config.security.allow_signup {
        tracing::warn!("Sign-up is open in production; set SECURITY_ALLOW_SIGNUP=false once the owner account exists");
    }

    let store = DatabaseManager::open(&config.database)
        .await
        .context("failed to open the data store")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store);
    let _audit = spawn_session_audit(&state.sessions);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Folio API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
