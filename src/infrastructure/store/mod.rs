//! Key-value store adapters.
//!
//! Provides two [`crate::domain::repositories::KeyValueStore`] implementations:
//! - [`RedisStore`] - Production Redis backend
//! - [`MemoryStore`] - In-process fake for tests

mod memory_store;
mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
