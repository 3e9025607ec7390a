//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};

/// Request to shorten a single URL.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    /// The long URL to shorten (absolute HTTP or HTTPS).
    pub destination: String,
}

/// A created (or reused) short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    /// The destination after normalization.
    pub long_url: String,
}
