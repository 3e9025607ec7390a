//! # linkforge
//!
//! A URL shortener on top of Redis: links expire after a freshness window,
//! repeated requests for the same URL reuse the live code, and every redirect
//! is counted in a ranking of the most visited destinations.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, identifier allocation, link
//!   store, ranking and the [`domain::repositories::KeyValueStore`] port
//! - **Application Layer** ([`application`]) - URL validation and the
//!   cancellable service facade
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Storage layout
//!
//! ```text
//! short:<decimal id>   hash  { url: <long url> }      expires with the link
//! long:<long url>      string <short code>            same expiration instant
//! url_metric           zset   <long url> -> visits    never expires
//! ```
//!
//! Short codes are the identifier in base62, least significant digit first.
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! cargo run
//!
//! curl -X POST localhost:8080/shorten-url -H 'content-type: application/json' \
//!      -d '{"destination":"https://example.com/a"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ResolutionService, ServiceSettings};
    pub use crate::domain::entities::{Identifier, LongUrl, RankedLink, ShortCode};
    pub use crate::domain::repositories::KeyValueStore;
    pub use crate::error::{AppError, ErrorKind};
    pub use crate::infrastructure::store::{MemoryStore, RedisStore};
    pub use crate::state::AppState;
}
