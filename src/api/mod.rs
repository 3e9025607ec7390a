//! REST API layer for HTTP request/response handling.
//!
//! Translates HTTP requests into [`crate::application::services::ResolutionService`]
//! calls and maps [`crate::error::AppError`] onto status codes.
//!
//! # Modules
//!
//! - [`dto`] - Request and response bodies
//! - [`error`] - Error to response mapping
//! - [`extract`] - Body and query extractors with JSON rejections
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Tracing and CORS layers
//! - [`routes`] - Route table

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
