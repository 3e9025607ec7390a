//! API route configuration.

use crate::api::handlers::{health_handler, metrics_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST /shorten-url`       - Create (or reuse) a short link
/// - `GET  /short-url/{code}`  - Redirect to the long URL, counting the visit
/// - `GET  /metrics`           - Most visited long URLs
/// - `GET  /health`            - Store connectivity check
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten-url", post(shorten_handler))
        .route("/short-url/{code}", get(redirect_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
}
