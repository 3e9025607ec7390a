//! Helpers with no dependency on the store or the HTTP layer.
//!
//! - [`base62`] - Identifier ↔ short code codec
//! - [`url_validator`] - Long URL validation and canonicalization
//! - [`call_guard`] - Timeout and cancellation around store calls

pub mod base62;
pub mod call_guard;
pub mod url_validator;
