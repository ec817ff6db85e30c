use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::matching::engine::MatchEngine;
use crate::notify::Notifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Holds the cached embedder chosen by `EMBEDDER`.
    pub engine: Arc<MatchEngine>,
    /// WABB when `WABB_WEBHOOK_URL` is set, log-only otherwise.
    pub notifier: Arc<dyn Notifier>,
}
