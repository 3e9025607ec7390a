//! Handler for the most visited links.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue},
};

use crate::api::dto::metrics::MetricsQuery;
use crate::api::extract::ApiQuery;
use crate::config::MAX_TOP_LINKS;
use crate::domain::entities::RankedLink;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the most visited long URLs, highest count first.
///
/// # Endpoint
///
/// `GET /metrics?limit=N`
///
/// # Response
///
/// ```json
/// [
///   { "url": "https://example.com/a", "score": 2 },
///   { "url": "https://example.com/b", "score": 0 }
/// ]
/// ```
///
/// The `X-Total-Count` header carries the number of returned entries.
///
/// # Errors
///
/// - **400 Bad Request**: `limit` is not a number, is 0, or is above 1000
/// - **404 Not Found**: nothing has been shortened yet
pub async fn metrics_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MetricsQuery>,
) -> Result<(HeaderMap, Json<Vec<RankedLink>>), AppError> {
    let limit = query.limit.unwrap_or(state.default_top);
    if limit > MAX_TOP_LINKS {
        return Err(AppError::invalid_input(format!(
            "limit must be at most {}",
            MAX_TOP_LINKS
        )));
    }

    let cancel = state.shutdown.child_token();
    let top = state.service.top_links(limit, &cancel).await?;

    let mut headers = HeaderMap::new();
    headers.insert("x-total-count", HeaderValue::from(top.len()));

    Ok((headers, Json(top)))
}
