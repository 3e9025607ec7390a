//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::ApiJson;
use crate::application::services::parse_long_url;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for `destination`.
///
/// # Endpoint
///
/// `POST /shorten-url`
///
/// # Request Body
///
/// ```json
/// { "destination": "https://example.com/some/page" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "dGk3Qx2",
///   "short_url": "http://localhost:8080/short-url/dGk3Qx2",
///   "long_url": "https://example.com/some/page"
/// }
/// ```
///
/// Shortening a URL that already has a live code returns that code again.
///
/// # Errors
///
/// - **400 Bad Request**: the body is not JSON with a string `destination`, or
///   `destination` is not an absolute HTTP(S) URL
/// - **503 Service Unavailable**: the store failed or the server is shutting down
pub async fn shorten_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let cancel = state.shutdown.child_token();

    let long_url = parse_long_url(&payload.destination)?;
    let code = state.service.shorten_url(&long_url, &cancel).await?;

    let response = ShortenResponse {
        short_url: state.short_url(code.as_str()),
        code: code.as_str().to_string(),
        long_url: long_url.into_inner(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
