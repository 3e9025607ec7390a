//! DTOs for the top-links endpoint.

use serde::Deserialize;

/// Query parameters of `GET /metrics`.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    /// Maximum number of entries; the configured default when absent.
    pub limit: Option<usize>,
}
