//! # Cardlend API Main Entry Point

use cardlend::migration::{Migrator, MigratorTrait};
use cardlend::{config::ConfigLoader, db::init_pool, server::run_server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;

    telemetry::init_tracing(&config);

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;

    // Bring the schema up to date before accepting traffic
    Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied");

    run_server(config, db).await
}
