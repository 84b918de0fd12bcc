mod config;
mod errors;
mod models;
mod pool_client;
mod recommendation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::pool_client::HttpJobPoolClient;
use crate::recommendation::specializations::RelatedSpecializations;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recommender v{}", env!("CARGO_PKG_VERSION"));

    // Upstream job pool
    let pool_client = HttpJobPoolClient::new(
        &config.job_pool_url,
        Duration::from_secs(config.job_pool_timeout_secs),
    )?;
    info!("Job pool client initialized ({})", config.job_pool_url);

    // Related-specializations table: file override or built-in
    let related = match &config.related_specializations_path {
        Some(path) => RelatedSpecializations::from_json_file(path)?,
        None => RelatedSpecializations::builtin(),
    };
    if related.is_empty() {
        warn!("Related-specializations table is empty; adjacent specializations earn no credit");
    } else {
        info!("Loaded {} related-specialization entries", related.len());
    }

    let state = AppState::new(&config, Arc::new(pool_client), Arc::new(related));

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
