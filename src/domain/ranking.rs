//! Visit-count ranking of long URLs.
//!
//! Entries live in one sorted set and never expire, even after the link that
//! created them has expired.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::RankedLink;
use crate::domain::entities::ranked_link::score_to_count;
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;
use crate::utils::call_guard::CallGuard;

pub struct RankingIndex {
    store: Arc<dyn KeyValueStore>,
    set: String,
}

impl RankingIndex {
    pub fn new(store: Arc<dyn KeyValueStore>, set: impl Into<String>) -> Self {
        Self {
            store,
            set: set.into(),
        }
    }

    /// Adds `url` with score 0 unless it is already ranked.
    ///
    /// Returns `true` if a new entry was created.
    pub async fn register(&self, url: &str, guard: &CallGuard) -> Result<bool, AppError> {
        guard
            .run("ZADD", self.store.zadd_nx(&self.set, url, 0.0))
            .await
    }

    /// Increments the visit count of `url` by one and returns the new count.
    ///
    /// The increment is done by the store, never read-modify-write here.
    pub async fn bump(&self, url: &str, guard: &CallGuard) -> Result<u64, AppError> {
        let score = guard
            .run("ZINCRBY", self.store.zincrby(&self.set, url, 1.0))
            .await?;
        debug!("Ranking {} -> {}", url, score);
        Ok(score_to_count(score))
    }

    /// Current visit count of `url`, if ranked.
    pub async fn score(&self, url: &str, guard: &CallGuard) -> Result<Option<u64>, AppError> {
        let score = guard
            .run("ZSCORE", self.store.zscore(&self.set, url))
            .await?;
        Ok(score.map(score_to_count))
    }

    /// Returns up to `n` entries, highest count first.
    ///
    /// Order among equal counts is undefined.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Empty`] if nothing is ranked.
    pub async fn top(&self, n: usize, guard: &CallGuard) -> Result<Vec<RankedLink>, AppError> {
        let entries = guard
            .run(
                "ZREVRANGEBYSCORE",
                self.store
                    .zrevrange_by_score(&self.set, 0.0, f64::INFINITY, 0, n),
            )
            .await?;

        if entries.is_empty() {
            return Err(AppError::Empty);
        }

        Ok(entries
            .into_iter()
            .map(|(url, score)| RankedLink::from_score(url, score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockKeyValueStore;
    use crate::error::ErrorKind;
    use crate::infrastructure::store::MemoryStore;
    use tokio_util::sync::CancellationToken;

    fn guard() -> CallGuard {
        CallGuard::new(CancellationToken::new(), std::time::Duration::from_secs(1))
    }

    fn index() -> RankingIndex {
        RankingIndex::new(Arc::new(MemoryStore::new()), "url_metric")
    }

    #[tokio::test]
    async fn test_register_does_not_reset_score() {
        let ranking = index();

        assert!(ranking.register("https://a.test/", &guard()).await.unwrap());
        ranking.bump("https://a.test/", &guard()).await.unwrap();
        assert!(!ranking.register("https://a.test/", &guard()).await.unwrap());

        assert_eq!(
            ranking.score("https://a.test/", &guard()).await.unwrap(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_bump_creates_missing_entry() {
        let ranking = index();

        assert_eq!(ranking.bump("https://new.test/", &guard()).await.unwrap(), 1);
        assert_eq!(ranking.bump("https://new.test/", &guard()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_bump_leaves_other_entries_untouched() {
        let ranking = index();
        ranking.register("https://a.test/", &guard()).await.unwrap();
        ranking.register("https://b.test/", &guard()).await.unwrap();

        ranking.bump("https://a.test/", &guard()).await.unwrap();

        assert_eq!(
            ranking.score("https://a.test/", &guard()).await.unwrap(),
            Some(1)
        );
        assert_eq!(
            ranking.score("https://b.test/", &guard()).await.unwrap(),
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_top_orders_by_descending_score() {
        let ranking = index();
        for (url, visits) in [
            ("https://a.test/", 1),
            ("https://b.test/", 4),
            ("https://c.test/", 2),
        ] {
            ranking.register(url, &guard()).await.unwrap();
            for _ in 0..visits {
                ranking.bump(url, &guard()).await.unwrap();
            }
        }

        let top = ranking.top(2, &guard()).await.unwrap();

        assert_eq!(
            top,
            vec![
                RankedLink::new("https://b.test/", 4),
                RankedLink::new("https://c.test/", 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_top_empty_set() {
        let err = index().top(3, &guard()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Empty);
    }

    #[tokio::test]
    async fn test_top_queries_full_score_range() {
        let mut mock_store = MockKeyValueStore::new();
        mock_store
            .expect_zrevrange_by_score()
            .withf(|set, min, max, offset, count| {
                set == "ranks" && *min == 0.0 && max.is_infinite() && *offset == 0 && *count == 5
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(vec![("https://a.test/".to_string(), 7.0)]));

        let ranking = RankingIndex::new(Arc::new(mock_store), "ranks");
        let top = ranking.top(5, &guard()).await.unwrap();

        assert_eq!(top, vec![RankedLink::new("https://a.test/", 7)]);
    }
}
