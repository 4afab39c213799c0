use tracing_subscriber::EnvFilter;

use drycraft_api::config::{self, StoreBackend, DEV_JWT_SECRET};
use drycraft_api::is_production;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("drycraft_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Dry Craft API in {:?} mode", config.environment);

    if is_production!() && config.security.jwt_secret == DEV_JWT_SECRET {
        anyhow::bail!("JWT_SECRET must be set in production");
    }
    if config.database.backend == StoreBackend::Memory {
        tracing::warn!("Using the in-memory store; data is lost on restart");
    }

    drycraft_api::server::run(config.clone()).await
}
