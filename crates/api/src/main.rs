use std::sync::Arc;

use anyhow::Context;

use shipyard_api::app::{build_app, services::AppServices};
use shipyard_api::config::ApiConfig;
use shipyard_infra::Seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shipyard_observability::init();

    let config = ApiConfig::from_env()?;

    let services = Arc::new(AppServices::in_memory());
    if let Some(path) = &config.seed_file {
        Seed::from_file(path)?
            .apply(
                &services.local_users,
                &services.oauth_users,
                services.tokens.as_ref(),
            )
            .await?;
    }

    let app = build_app(&config, services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
