//! DroneScout edge server - one JSON API over the fleet cloud and weather provider

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scout_server::{api, config::Config, state::AppState};

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("scout_server=debug".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_json)?;

    tracing::info!("Starting DroneScout edge server...");
    if config.fleet_api_token.is_none() {
        tracing::warn!("SKYDIO_API_TOKEN is not set; fleet API calls will be unauthenticated");
    }
    if config.weather_api_key.is_none() {
        tracing::warn!("WEATHER_API_KEY is not set; /weather will return 503");
    }

    let port = config.server_port;
    let state = Arc::new(AppState::new(config)?);
    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
