//! Business logic services for the application layer.

pub mod resolution_service;

pub use resolution_service::{
    CodeInspection, MAX_LINK_TTL, ResolutionService, ServiceSettings, parse_long_url,
};
