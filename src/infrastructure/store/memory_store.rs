//! In-process [`KeyValueStore`] with Redis-like expiration semantics.
//!
//! Used by unit and integration tests in place of a live Redis. Tests move
//! time forward with [`MemoryStore::advance`], which ages every stored key
//! instead of sleeping. Writes made afterwards are stamped with the wall
//! clock as usual.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::repositories::{IndexCommit, KeyValueStore};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
enum Value {
    Text(String),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Default)]
struct Inner {
    keys: HashMap<String, Entry>,
    sorted_sets: HashMap<String, HashMap<String, f64>>,
}

impl Inner {
    /// Returns the entry under `key`, evicting it first if it has expired.
    fn live(&mut self, key: &str) -> Option<&mut Entry> {
        let now = Utc::now();
        if self.keys.get(key).is_some_and(|e| e.is_expired(now)) {
            self.keys.remove(key);
        }
        self.keys.get_mut(key)
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lets `by` pass for every key currently stored, expiring them as Redis
    /// would. Sorted sets carry no expiration and are left as they are.
    pub fn advance(&self, by: Duration) {
        let now = Utc::now();
        let mut inner = self.lock();
        for entry in inner.keys.values_mut() {
            if let Some(at) = entry.expires_at.as_mut() {
                *at -= by;
            }
        }
        inner.keys.retain(|_, entry| !entry.is_expired(now));
    }

    /// Expiration of a live key, if it has one.
    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.lock().live(key).and_then(|e| e.expires_at)
    }

    /// Number of members in a sorted set.
    pub fn zcard(&self, set: &str) -> usize {
        self.lock().sorted_sets.get(set).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.lock().live(key).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match self.lock().live(key) {
            Some(Entry {
                value: Value::Text(text),
                ..
            }) => Ok(Some(text.clone())),
            Some(_) => Err(AppError::store_unavailable(
                "GET",
                "WRONGTYPE Operation against a key holding the wrong kind of value",
            )),
            None => Ok(None),
        }
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, AppError> {
        match self.lock().live(key) {
            Some(Entry {
                value: Value::Hash(fields),
                ..
            }) => Ok(fields.get(field).cloned()),
            Some(_) => Err(AppError::store_unavailable(
                "HGET",
                "WRONGTYPE Operation against a key holding the wrong kind of value",
            )),
            None => Ok(None),
        }
    }

    async fn claim_link(
        &self,
        key: &str,
        field: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut inner = self.lock();
        if inner.live(key).is_some() {
            return Ok(false);
        }

        let fields = HashMap::from([(field.to_owned(), value.to_owned())]);
        inner.keys.insert(
            key.to_owned(),
            Entry {
                value: Value::Hash(fields),
                expires_at: Some(expires_at),
            },
        );
        Ok(true)
    }

    async fn commit_index(&self, commit: IndexCommit) -> Result<(), AppError> {
        let mut inner = self.lock();

        inner
            .sorted_sets
            .entry(commit.ranking_set)
            .or_default()
            .entry(commit.member)
            .or_insert(0.0);

        inner.keys.insert(
            commit.long_key,
            Entry {
                value: Value::Text(commit.short_code),
                expires_at: Some(commit.expires_at),
            },
        );
        Ok(())
    }

    async fn zadd_nx(&self, set: &str, member: &str, score: f64) -> Result<bool, AppError> {
        let mut inner = self.lock();
        let members = inner.sorted_sets.entry(set.to_owned()).or_default();
        if members.contains_key(member) {
            return Ok(false);
        }
        members.insert(member.to_owned(), score);
        Ok(true)
    }

    async fn zincrby(&self, set: &str, member: &str, delta: f64) -> Result<f64, AppError> {
        let mut inner = self.lock();
        let score = inner
            .sorted_sets
            .entry(set.to_owned())
            .or_default()
            .entry(member.to_owned())
            .or_insert(0.0);
        *score += delta;
        Ok(*score)
    }

    async fn zscore(&self, set: &str, member: &str) -> Result<Option<f64>, AppError> {
        Ok(self
            .lock()
            .sorted_sets
            .get(set)
            .and_then(|members| members.get(member).copied()))
    }

    async fn zrevrange_by_score(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: usize,
        count: usize,
    ) -> Result<Vec<(String, f64)>, AppError> {
        let inner = self.lock();
        let Some(members) = inner.sorted_sets.get(set) else {
            return Ok(Vec::new());
        };

        let mut ranked: Vec<(String, f64)> = members
            .iter()
            .filter(|(_, score)| **score >= min && **score <= max)
            .map(|(member, score)| (member.clone(), *score))
            .collect();

        // Redis orders equal scores in reverse lexicographic order here.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        Ok(ranked.into_iter().skip(offset).take(count).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_is_set_if_absent() {
        let store = MemoryStore::new();
        let expires_at = Utc::now() + Duration::hours(1);

        assert!(
            store
                .claim_link("short:1", "url", "https://a.test/", expires_at)
                .await
                .unwrap()
        );
        assert!(
            !store
                .claim_link("short:1", "url", "https://b.test/", expires_at)
                .await
                .unwrap()
        );

        assert_eq!(
            store.hget("short:1", "url").await.unwrap().as_deref(),
            Some("https://a.test/")
        );
        assert_eq!(store.expires_at("short:1"), Some(expires_at));
    }

    #[tokio::test]
    async fn test_expired_keys_disappear_and_can_be_reclaimed() {
        let store = MemoryStore::new();
        let expires_at = Utc::now() + Duration::minutes(10);
        store
            .claim_link("short:1", "url", "https://a.test/", expires_at)
            .await
            .unwrap();

        store.advance(Duration::minutes(11));

        assert!(!store.exists("short:1").await.unwrap());
        assert_eq!(store.hget("short:1", "url").await.unwrap(), None);
        let reclaim_at = Utc::now() + Duration::hours(1);
        assert!(
            store
                .claim_link("short:1", "url", "https://b.test/", reclaim_at)
                .await
                .unwrap()
        );
        assert_eq!(store.expires_at("short:1"), Some(reclaim_at));
    }

    #[tokio::test]
    async fn test_sorted_sets_do_not_expire() {
        let store = MemoryStore::new();
        store.zincrby("ranks", "https://a.test/", 1.0).await.unwrap();

        store.advance(Duration::days(365));

        assert_eq!(
            store.zscore("ranks", "https://a.test/").await.unwrap(),
            Some(1.0)
        );
    }

    #[tokio::test]
    async fn test_commit_index_keeps_existing_score() {
        let store = MemoryStore::new();
        store.zincrby("ranks", "https://a.test/", 4.0).await.unwrap();

        store
            .commit_index(IndexCommit {
                ranking_set: "ranks".to_string(),
                member: "https://a.test/".to_string(),
                long_key: "long:https://a.test/".to_string(),
                short_code: "b".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            })
            .await
            .unwrap();

        assert_eq!(
            store.zscore("ranks", "https://a.test/").await.unwrap(),
            Some(4.0)
        );
        assert_eq!(
            store.get("long:https://a.test/").await.unwrap().as_deref(),
            Some("b")
        );
    }

    #[tokio::test]
    async fn test_wrong_type_is_reported() {
        let store = MemoryStore::new();
        store
            .claim_link(
                "short:1",
                "url",
                "https://a.test/",
                Utc::now() + Duration::hours(1),
            )
            .await
            .unwrap();

        assert!(store.get("short:1").await.is_err());
    }

    #[tokio::test]
    async fn test_zrevrange_respects_bounds_offset_and_count() {
        let store = MemoryStore::new();
        for (member, score) in [("a", 1.0), ("b", 5.0), ("c", 3.0), ("d", 0.0)] {
            store.zadd_nx("ranks", member, score).await.unwrap();
        }

        let top = store
            .zrevrange_by_score("ranks", 0.0, f64::INFINITY, 1, 2)
            .await
            .unwrap();
        assert_eq!(top, vec![("c".to_string(), 3.0), ("a".to_string(), 1.0)]);

        let bounded = store
            .zrevrange_by_score("ranks", 2.0, 4.0, 0, 10)
            .await
            .unwrap();
        assert_eq!(bounded, vec![("c".to_string(), 3.0)]);
    }

    #[tokio::test]
    async fn test_advance_ages_existing_keys_only() {
        let store = MemoryStore::new();
        store
            .claim_link("short:1", "url", "https://a.test/", Utc::now() + Duration::hours(2))
            .await
            .unwrap();

        store.advance(Duration::hours(1));

        assert!(store.exists("short:1").await.unwrap());
        let fresh = Utc::now() + Duration::hours(2);
        store
            .claim_link("short:2", "url", "https://b.test/", fresh)
            .await
            .unwrap();

        store.advance(Duration::hours(1));

        assert!(!store.exists("short:1").await.unwrap());
        assert!(store.exists("short:2").await.unwrap());
    }
}
