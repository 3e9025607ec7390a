//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::ResolutionService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ResolutionService>,
    /// Prefix joined with a short code to build the public short URL.
    pub base_url: String,
    /// Number of entries `/metrics` returns when the query has no `limit`.
    pub default_top: usize,
    /// Cancelled on shutdown; each request works under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        service: Arc<ResolutionService>,
        base_url: impl Into<String>,
        default_top: usize,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            service,
            base_url: base_url.into(),
            default_top,
            shutdown,
        }
    }

    /// Full public URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}{}", self.base_url, code)
    }
}
