//! Domain layer: the short-code allocation and resolution core.
//!
//! # Architecture
//!
//! - [`entities`] - Identifiers, codes, URLs, records, ranking entries
//! - [`repositories`] - The [`repositories::KeyValueStore`] port
//! - [`allocator`] - Collision-free identifier allocation
//! - [`link_store`] - Long ↔ short indexes with expiration
//! - [`ranking`] - Visit-count ranking
//!
//! # Design Principles
//!
//! - No in-process shared mutable state; the store handle is injected into
//!   every component
//! - Every store call runs under a [`crate::utils::call_guard::CallGuard`]
//! - Orchestration and input validation live in
//!   [`crate::application::services`]

pub mod allocator;
pub mod entities;
pub mod link_store;
pub mod ranking;
pub mod repositories;
