mod config;
mod domain;
mod error;
mod infra;
mod middleware;
mod relay;
mod routes;
mod state;

use anyhow::Context;
use config::RelayConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env()?;
    let addr = config.bind_addr;
    tracing::info!(provider = %config.provider.base_url, "loaded relay config");

    let shared_state = state::AppState::from_config(config)?;
    let app = routes::router(shared_state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
