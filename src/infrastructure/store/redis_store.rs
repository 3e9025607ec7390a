//! Redis-backed [`KeyValueStore`].

use std::sync::LazyLock;

use crate::domain::repositories::{IndexCommit, KeyValueStore};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, RedisError, Script, aio::ConnectionManager};
use tracing::{debug, error, info};

/// Set-if-absent for a link record: the hash field and its expiration are
/// written in one server-side step, or not at all.
static CLAIM_SCRIPT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
redis.call('EXPIREAT', KEYS[1], ARGV[3])
return 1
",
    )
});

/// Redis store using a multiplexed [`ConnectionManager`].
///
/// The manager reconnects on its own; each call clones the handle, so the
/// store is safe to share across request tasks.
#[derive(Clone)]
pub struct RedisStore {
    client: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(store_error("CONNECT"))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(store_error("CONNECT"))?;

        let store = Self { client: manager };
        store.ping().await?;

        info!("✓ Connected to Redis");
        Ok(store)
    }
}

fn store_error(operation: &'static str) -> impl FnOnce(RedisError) -> AppError {
    move |e| {
        error!("Redis {} failed: {}", operation, e);
        AppError::store_unavailable(operation, e)
    }
}

/// Formats a score bound the way `ZRANGEBYSCORE` expects infinities.
fn score_bound(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        value.to_string()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let mut conn = self.client.clone();
        conn.exists(key).await.map_err(store_error("EXISTS"))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.clone();
        let value: Option<String> = conn.get(key).await.map_err(store_error("GET"))?;
        debug!(
            "GET {}: {}",
            key,
            if value.is_some() { "hit" } else { "miss" }
        );
        Ok(value)
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.clone();
        conn.hget(key, field).await.map_err(store_error("HGET"))
    }

    async fn claim_link(
        &self,
        key: &str,
        field: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut conn = self.client.clone();
        let claimed: i64 = CLAIM_SCRIPT
            .key(key)
            .arg(field)
            .arg(value)
            .arg(expires_at.timestamp())
            .invoke_async(&mut conn)
            .await
            .map_err(store_error("CLAIM"))?;
        Ok(claimed == 1)
    }

    async fn commit_index(&self, commit: IndexCommit) -> Result<(), AppError> {
        let mut conn = self.client.clone();
        redis::pipe()
            .atomic()
            .cmd("ZADD")
            .arg(&commit.ranking_set)
            .arg("NX")
            .arg(0)
            .arg(&commit.member)
            .ignore()
            .cmd("SET")
            .arg(&commit.long_key)
            .arg(&commit.short_code)
            .ignore()
            .cmd("EXPIREAT")
            .arg(&commit.long_key)
            .arg(commit.expires_at.timestamp())
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_error("COMMIT_INDEX"))
    }

    async fn zadd_nx(&self, set: &str, member: &str, score: f64) -> Result<bool, AppError> {
        let mut conn = self.client.clone();
        let added: i64 = redis::cmd("ZADD")
            .arg(set)
            .arg("NX")
            .arg(score)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(store_error("ZADD"))?;
        Ok(added > 0)
    }

    async fn zincrby(&self, set: &str, member: &str, delta: f64) -> Result<f64, AppError> {
        let mut conn = self.client.clone();
        conn.zincr(set, member, delta)
            .await
            .map_err(store_error("ZINCRBY"))
    }

    async fn zscore(&self, set: &str, member: &str) -> Result<Option<f64>, AppError> {
        let mut conn = self.client.clone();
        conn.zscore(set, member)
            .await
            .map_err(store_error("ZSCORE"))
    }

    async fn zrevrange_by_score(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: usize,
        count: usize,
    ) -> Result<Vec<(String, f64)>, AppError> {
        let mut conn = self.client.clone();
        redis::cmd("ZREVRANGEBYSCORE")
            .arg(set)
            .arg(score_bound(max))
            .arg(score_bound(min))
            .arg("WITHSCORES")
            .arg("LIMIT")
            .arg(offset)
            .arg(count)
            .query_async(&mut conn)
            .await
            .map_err(store_error("ZREVRANGEBYSCORE"))
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.map_err(store_error("PING"))
    }
}
