mod config;
mod db;
mod embedding;
mod errors;
mod matching;
mod models;
mod notify;
mod retry;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, EmbedderKind};
use crate::db::create_pool;
use crate::embedding::{CachedEmbedder, Embedder, HashEmbedder, HttpEmbedder};
use crate::matching::engine::MatchEngine;
use crate::notify::{Notifier, TracingNotifier, WabbNotifier};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CampusPe match service v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize embedder (hash by default; swap via EMBEDDER=http)
    let embedder = build_embedder(&config)?;
    info!(
        "Embedder initialized: {} ({} dims, cache {})",
        embedder.name(),
        embedder.dimension(),
        config.embedding_cache_size
    );

    let engine = MatchEngine::new(embedder).with_skill_mode(config.skill_match_mode);
    info!(
        "Match engine: skill mode {:?}, threshold {}",
        config.skill_match_mode, config.match_threshold
    );

    let notifier = build_notifier(&config)?;
    info!("Notifier initialized: {}", notifier.name());

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        engine: Arc::new(engine),
        notifier,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the CampusPe web app domains

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the embedding backend and wraps it in the per-entity cache.
fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    let inner: Arc<dyn Embedder> = match config.embedder {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(config.embedding_dimension)),
        EmbedderKind::Http => {
            let url = config
                .embedding_api_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("EMBEDDER=http requires EMBEDDING_API_URL"))?;
            Arc::new(HttpEmbedder::new(
                url,
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
                config.embedding_dimension,
            )?)
        }
    };
    Ok(Arc::new(CachedEmbedder::new(
        inner,
        config.embedding_cache_size,
    )))
}

fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>> {
    match &config.wabb_webhook_url {
        Some(url) => Ok(Arc::new(WabbNotifier::new(url.clone())?)),
        None => Ok(Arc::new(TracingNotifier)),
    }
}
