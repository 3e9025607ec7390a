//! Application layer services.
//!
//! Services orchestrate the domain components and own input validation.
//! They are the only surface the HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::resolution_service::ResolutionService`] - Shorten, resolve
//!   and rank links

pub mod services;
