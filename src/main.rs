use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinetrack::api::{create_router, AppState};
use cinetrack::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinetrack=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        api_url = %config.api_url,
        endpoint_mode = ?config.endpoint_mode,
        mutation_mode = ?config.mutation_mode,
        "Configuration loaded"
    );

    // Initialize application state
    let state = AppState::from_config(&config)?;

    // Load once before accepting requests
    let report = state.controller.load().await;
    tracing::info!(total = report.total, "Initial catalog load finished");

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
