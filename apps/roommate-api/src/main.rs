use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with environment-aware formatting
    init_tracing(&config.environment);

    // The store connects on first use; startup never waits for MongoDB
    info!(
        url = %config.mongodb.redacted_url(),
        database = %config.mongodb.database(),
        collection = %config.collection,
        "MongoDB connection deferred until first request"
    );

    let state = AppState::new(config);

    // Build router with API routes
    let api_routes = api::routes(&state);

    // Merge liveness route
    let app = api_routes.merge(health_router(state.config.app));

    // Create router with OpenAPI documentation
    let router = create_router::<openapi::ApiDoc>(app)?;

    let store = state.store.clone();

    // Run the server; the client is released once connections have drained
    create_production_app(
        router,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB client...");
            store.shutdown().await;
            info!("MongoDB client closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Roommate API shutdown complete");
    Ok(())
}
