pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Inline scoring
        .route("/api/v1/matches/score", post(handlers::handle_score))
        .route("/api/v1/matches/predict", post(handlers::handle_predict))
        // Stored records
        .route(
            "/api/v1/jobs/:job_id/matches/:student_id",
            get(handlers::handle_stored_match),
        )
        .route(
            "/api/v1/students/:student_id/recommendations",
            get(handlers::handle_recommendations),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates",
            get(handlers::handle_candidates),
        )
        .route(
            "/api/v1/jobs/:job_id/alerts",
            post(handlers::handle_job_alerts),
        )
        .with_state(state)
}
