//! Shorten / resolve / top-links facade consumed by the HTTP layer and the
//! admin CLI.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::domain::allocator::{IdAllocator, IdSource};
use crate::domain::entities::{Identifier, LongUrl, RankedLink, ShortCode};
use crate::domain::link_store::LinkStore;
use crate::domain::ranking::RankingIndex;
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;
use crate::utils::call_guard::CallGuard;

/// Longest accepted freshness window (ten years).
pub const MAX_LINK_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Tunables of the service, usually derived from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Freshness window of a link and its reverse index entry.
    pub link_ttl: Duration,
    /// Upper bound on a single store round trip.
    pub store_timeout: Duration,
    /// Name of the ranking sorted set.
    pub ranking_key: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            link_ttl: Duration::from_secs(24 * 60 * 60),
            store_timeout: Duration::from_secs(2),
            ranking_key: "url_metric".to_string(),
        }
    }
}

/// What the store knows about a short code, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeInspection {
    pub identifier: Identifier,
    pub short_key: String,
    pub exists: bool,
}

/// Service for shortening, resolving and ranking links.
///
/// URL validation happens here; everything else is delegated to
/// [`LinkStore`] and [`RankingIndex`]. Every public method takes a
/// cancellation token and stops at the next store call once it fires.
pub struct ResolutionService {
    links: LinkStore,
    ranking: RankingIndex,
    store: Arc<dyn KeyValueStore>,
    store_timeout: Duration,
}

impl ResolutionService {
    /// Creates a service drawing identifiers from the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `settings.link_ttl` is zero or
    /// longer than [`MAX_LINK_TTL`].
    pub fn new(store: Arc<dyn KeyValueStore>, settings: ServiceSettings) -> Result<Self, AppError> {
        let allocator = IdAllocator::new(store.clone());
        Self::with_allocator(store, allocator, settings)
    }

    /// Creates a service drawing identifiers from `source`.
    pub fn with_id_source(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn IdSource>,
        settings: ServiceSettings,
    ) -> Result<Self, AppError> {
        let allocator = IdAllocator::with_source(store.clone(), source);
        Self::with_allocator(store, allocator, settings)
    }

    fn with_allocator(
        store: Arc<dyn KeyValueStore>,
        allocator: IdAllocator,
        settings: ServiceSettings,
    ) -> Result<Self, AppError> {
        if settings.link_ttl.is_zero() || settings.link_ttl > MAX_LINK_TTL {
            return Err(AppError::invalid_input(format!(
                "link TTL must be between 1s and {}s, got {}s",
                MAX_LINK_TTL.as_secs(),
                settings.link_ttl.as_secs()
            )));
        }
        let ttl = chrono::Duration::from_std(settings.link_ttl)
            .map_err(|e| AppError::invalid_input(format!("link TTL out of range: {e}")))?;

        Ok(Self {
            links: LinkStore::new(store.clone(), allocator, settings.ranking_key.clone(), ttl),
            ranking: RankingIndex::new(store.clone(), settings.ranking_key),
            store,
            store_timeout: settings.store_timeout,
        })
    }

    fn guard(&self, cancel: &CancellationToken) -> CallGuard {
        CallGuard::new(cancel.clone(), self.store_timeout)
    }

    /// Shortens `raw_url`, reusing the live code if one exists.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] if `raw_url` is not an absolute HTTP(S) URL
    /// - [`AppError::StoreUnavailable`], [`AppError::Cancelled`],
    ///   [`AppError::AllocationExhausted`] from the link store
    pub async fn shorten(
        &self,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> Result<ShortCode, AppError> {
        let long_url = parse_long_url(raw_url)?;
        self.shorten_url(&long_url, cancel).await
    }

    /// Shortens an already validated URL.
    pub async fn shorten_url(
        &self,
        long_url: &LongUrl,
        cancel: &CancellationToken,
    ) -> Result<ShortCode, AppError> {
        self.links.shorten(long_url, &self.guard(cancel)).await
    }

    /// Resolves `code` and counts the visit.
    ///
    /// A failed ranking update is logged and does not fail the resolve; a
    /// cancellation during the update still does.
    ///
    /// # Errors
    ///
    /// - [`AppError::MalformedCode`] if `code` is not base62
    /// - [`AppError::NotFound`] if the link does not exist or has expired
    /// - [`AppError::StoreUnavailable`], [`AppError::Cancelled`]
    pub async fn resolve(
        &self,
        code: &str,
        cancel: &CancellationToken,
    ) -> Result<LongUrl, AppError> {
        let guard = self.guard(cancel);
        let long_url = self.links.resolve(code, &guard).await?;

        match self.ranking.bump(long_url.as_str(), &guard).await {
            Ok(_) => {}
            Err(AppError::Cancelled) => return Err(AppError::Cancelled),
            Err(e) => warn!("Failed to record visit for {}: {}", long_url, e),
        }

        Ok(long_url)
    }

    /// Returns up to `n` most visited long URLs.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] if `n` is zero
    /// - [`AppError::Empty`] if nothing is ranked yet
    pub async fn top_links(
        &self,
        n: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<RankedLink>, AppError> {
        if n == 0 {
            return Err(AppError::invalid_input("limit must be at least 1"));
        }
        self.ranking.top(n, &self.guard(cancel)).await
    }

    /// Adds `raw_url` to the ranking with zero visits unless it is ranked.
    ///
    /// Returns `true` if a new entry was created.
    pub async fn register(
        &self,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, AppError> {
        let long_url = parse_long_url(raw_url)?;
        self.ranking
            .register(long_url.as_str(), &self.guard(cancel))
            .await
    }

    /// Returns the live short code of `raw_url` without creating one.
    pub async fn lookup(
        &self,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ShortCode>, AppError> {
        let long_url = parse_long_url(raw_url)?;
        self.links
            .reverse_lookup(&long_url, &self.guard(cancel))
            .await
    }

    /// Current visit count of `raw_url`, if ranked.
    pub async fn score(
        &self,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<u64>, AppError> {
        let long_url = parse_long_url(raw_url)?;
        self.ranking
            .score(long_url.as_str(), &self.guard(cancel))
            .await
    }

    /// Decodes `code` and reports whether its record is live.
    pub async fn inspect(
        &self,
        code: &str,
        cancel: &CancellationToken,
    ) -> Result<CodeInspection, AppError> {
        let identifier = ShortCode::parse(code)?;
        let exists = self
            .links
            .allocator()
            .is_used(identifier, &self.guard(cancel))
            .await?;

        Ok(CodeInspection {
            identifier,
            short_key: identifier.short_key(),
            exists,
        })
    }

    /// Checks that the store answers.
    pub async fn health(&self, cancel: &CancellationToken) -> Result<(), AppError> {
        self.guard(cancel).run("PING", self.store.ping()).await
    }
}

/// Validates and normalizes a caller-supplied long URL.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] with the validation failure as message.
pub fn parse_long_url(raw_url: &str) -> Result<LongUrl, AppError> {
    LongUrl::parse(raw_url).map_err(|e| AppError::invalid_input(e.to_string()))
}
