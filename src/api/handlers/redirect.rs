//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its long URL and counts the visit.
///
/// # Endpoint
///
/// `GET /short-url/{code}`
///
/// Answers `307 Temporary Redirect` so clients do not cache the hop and every
/// visit reaches the ranking.
///
/// # Errors
///
/// - **400 Bad Request**: `code` contains characters outside base62
/// - **404 Not Found**: no live link for `code`
/// - **503 Service Unavailable**: the store failed or the server is shutting down
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let cancel = state.shutdown.child_token();

    let long_url = state.service.resolve(&code, &cancel).await?;
    debug!("Redirecting {} -> {}", code, long_url);

    Ok(Redirect::temporary(long_url.as_str()))
}
