mod catalog;
mod config;
mod errors;
mod models;
mod recommend;
mod routes;
mod scoring;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::embedder::HashingEmbedder;
use crate::catalog::index::FlatIpIndex;
use crate::catalog::load_catalog;
use crate::config::Config;
use crate::recommend::engine::RecommendationEngine;
use crate::routes::build_router;
use crate::scoring::settings::load_settings;
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

    let settings = load_settings(&config.engine_config_path).context("loading engine settings")?;

    let catalog = load_catalog(&config.catalog_path, HashingEmbedder::NAME)
        .context("loading catalog artifact")?;
    let embedder = HashingEmbedder::new(catalog.dimension());
    let index = FlatIpIndex::new(catalog.embeddings).context("building vector index")?;

    // Engine is built before serving; handlers only ever see the shared Arc.
    let engine = RecommendationEngine::new(
        catalog.postings,
        Box::new(index),
        Box::new(embedder),
        settings,
    )
    .context("initializing recommendation engine")?;
    info!(
        "Engine ready: {} postings, {} index, {} embedder, shortlist of {}",
        engine.catalog_size(),
        engine.index_name(),
        engine.embedder_name(),
        engine.settings().retrieval.top_k
    );

    let state = AppState {
        engine: Arc::new(engine),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
