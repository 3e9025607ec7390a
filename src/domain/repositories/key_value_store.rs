//! Port to the external key-value store.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Index writes that accompany a freshly claimed link record.
///
/// Applied by [`KeyValueStore::commit_index`] as one all-or-nothing batch.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexCommit {
    /// Sorted set holding visit counts.
    pub ranking_set: String,
    /// Long URL registered in the ranking set with score 0 if absent.
    pub member: String,
    /// Reverse index key (`long:<url>`).
    pub long_key: String,
    /// Value stored under `long_key`.
    pub short_code: String,
    /// Absolute expiration shared with the link record.
    pub expires_at: DateTime<Utc>,
}

/// Store primitives consumed by the shortener core.
///
/// Implementations must serialize individual operations; the core keeps no
/// shared state of its own and relies on these semantics for uniqueness and
/// atomic increments.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis via `ConnectionManager`
/// - [`crate::infrastructure::store::MemoryStore`] - in-process fake for tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `EXISTS key`.
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// `GET key`; `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// `HGET key field`; `None` if the key or field is absent.
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, AppError>;

    /// Atomically creates hash `key` with `field = value` and `EXPIREAT
    /// expires_at`, only if `key` does not exist.
    ///
    /// Returns `true` if this call created the key, `false` if it was
    /// already present (nothing is written in that case).
    async fn claim_link(
        &self,
        key: &str,
        field: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    /// Applies `ZADD NX`, `SET` and `EXPIREAT` from `commit` atomically.
    async fn commit_index(&self, commit: IndexCommit) -> Result<(), AppError>;

    /// `ZADD set NX score member`; returns `true` if the member was added.
    async fn zadd_nx(&self, set: &str, member: &str, score: f64) -> Result<bool, AppError>;

    /// `ZINCRBY set delta member`; returns the new score.
    async fn zincrby(&self, set: &str, member: &str, delta: f64) -> Result<f64, AppError>;

    /// `ZSCORE set member`.
    async fn zscore(&self, set: &str, member: &str) -> Result<Option<f64>, AppError>;

    /// `ZREVRANGEBYSCORE set max min WITHSCORES LIMIT offset count`.
    ///
    /// Highest score first. Order among equal scores is whatever the store
    /// returns.
    async fn zrevrange_by_score(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: usize,
        count: usize,
    ) -> Result<Vec<(String, f64)>, AppError>;

    /// Round-trip health probe.
    async fn ping(&self) -> Result<(), AppError>;
}
