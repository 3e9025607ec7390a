//! Infrastructure layer for external integrations.
//!
//! Implements the store port defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Redis and in-memory key-value stores

pub mod store;
