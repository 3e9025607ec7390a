//! Port definitions for the domain layer.
//!
//! The core talks to its single shared resource, the key-value store,
//! through [`KeyValueStore`]. Adapters live in
//! `crate::infrastructure::store`; a mock is generated via `mockall` for
//! unit tests.

pub mod key_value_store;

pub use key_value_store::{IndexCommit, KeyValueStore};

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
