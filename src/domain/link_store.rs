//! Bidirectional long ↔ short mapping with expiration.
//!
//! # Key layout
//!
//! - `short:<id>` - hash `{url}`, the link record
//! - `long:<url>` - string holding the short code, the reverse index entry
//! - ranking set - sorted set of long URLs (see [`crate::domain::ranking`])
//!
//! Both keys of a link expire at the same absolute timestamp, so a live
//! reverse entry always names a live record.
//!
//! # Write ordering
//!
//! `shorten` makes two round trips: the record claim (atomic, see
//! [`IdAllocator`]) and then one atomic batch for the ranking entry and the
//! reverse index. If the process dies between the two, the record is an
//! orphan that expires on its own and the next `shorten` of the same URL
//! allocates a new identifier.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::domain::allocator::IdAllocator;
use crate::domain::entities::{Identifier, LINK_URL_FIELD, LongUrl, ShortCode};
use crate::domain::repositories::{IndexCommit, KeyValueStore};
use crate::error::AppError;
use crate::utils::call_guard::CallGuard;

pub struct LinkStore {
    store: Arc<dyn KeyValueStore>,
    allocator: IdAllocator,
    ranking_set: String,
    ttl: Duration,
}

impl LinkStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        allocator: IdAllocator,
        ranking_set: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            allocator,
            ranking_set: ranking_set.into(),
            ttl,
        }
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// Returns the short code for `long_url`, creating the link if needed.
    ///
    /// A live reverse entry short-circuits: its code is returned with no
    /// allocation and no ranking write.
    ///
    /// # Errors
    ///
    /// Store, allocation and cancellation errors are propagated. A
    /// cancellation observed between the record claim and the index commit
    /// leaves an orphan record (see module docs).
    pub async fn shorten(&self, long_url: &LongUrl, guard: &CallGuard) -> Result<ShortCode, AppError> {
        if let Some(existing) = self.reverse_lookup(long_url, guard).await? {
            debug!("Reverse index HIT: {} -> {}", long_url, existing);
            return Ok(existing);
        }

        let expires_at = Utc::now().checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::invalid_input(format!("link TTL of {}s is out of range", self.ttl.num_seconds()))
        })?;
        let record = self.allocator.allocate(long_url, expires_at, guard).await?;
        let code = record.short_code();

        guard.check()?;

        let commit = IndexCommit {
            ranking_set: self.ranking_set.clone(),
            member: long_url.as_str().to_owned(),
            long_key: long_url.long_key(),
            short_code: code.as_str().to_owned(),
            expires_at,
        };
        guard
            .run("COMMIT_INDEX", self.store.commit_index(commit))
            .await?;

        info!(
            "Shortened {} -> {} (id {}, expires {})",
            long_url,
            code,
            record.identifier,
            expires_at.to_rfc3339()
        );

        Ok(code)
    }

    /// Looks up the long URL behind `code`.
    ///
    /// # Errors
    ///
    /// - [`AppError::MalformedCode`] if `code` is not base62
    /// - [`AppError::NotFound`] if there is no live record, or it is empty
    pub async fn resolve(&self, code: &str, guard: &CallGuard) -> Result<LongUrl, AppError> {
        let identifier = ShortCode::parse(code)?;
        self.resolve_identifier(identifier, code, guard).await
    }

    /// Reads the reverse index without writing anything.
    pub async fn reverse_lookup(
        &self,
        long_url: &LongUrl,
        guard: &CallGuard,
    ) -> Result<Option<ShortCode>, AppError> {
        let existing = guard
            .run("GET", self.store.get(&long_url.long_key()))
            .await?;

        Ok(existing
            .filter(|code| !code.is_empty())
            .map(ShortCode::from_stored))
    }

    async fn resolve_identifier(
        &self,
        identifier: Identifier,
        code: &str,
        guard: &CallGuard,
    ) -> Result<LongUrl, AppError> {
        let stored = guard
            .run(
                "HGET",
                self.store.hget(&identifier.short_key(), LINK_URL_FIELD),
            )
            .await?;

        match stored {
            Some(url) if !url.is_empty() => Ok(LongUrl::from_stored(url)),
            _ => {
                debug!("No live record for {} ({})", code, identifier.short_key());
                Err(AppError::not_found(code))
            }
        }
    }
}
