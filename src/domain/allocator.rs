//! Collision-free identifier allocation.
//!
//! An identifier is drawn at random and committed with the store's atomic
//! set-if-absent claim, so two concurrent allocations can never both win the
//! same key. There is no separate existence check before the write.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{Identifier, LINK_URL_FIELD, LinkRecord, LongUrl};
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;
use crate::utils::call_guard::CallGuard;
use chrono::{DateTime, Utc};

/// Consecutive collisions tolerated before giving up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 16;

/// Source of candidate identifiers.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Uniform draws over the full `u64` range from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_id(&self) -> u64 {
        rand::random()
    }
}

pub struct IdAllocator {
    store: Arc<dyn KeyValueStore>,
    source: Arc<dyn IdSource>,
}

impl IdAllocator {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_source(store, Arc::new(RandomIdSource))
    }

    pub fn with_source(store: Arc<dyn KeyValueStore>, source: Arc<dyn IdSource>) -> Self {
        Self { store, source }
    }

    /// Allocates an unused identifier and commits the link record under it.
    ///
    /// Zero is never issued (its short code would be empty). Each candidate
    /// is claimed with [`KeyValueStore::claim_link`]; a lost claim means the
    /// identifier is taken and a fresh one is drawn.
    ///
    /// # Errors
    ///
    /// - [`AppError::AllocationExhausted`] after [`MAX_ALLOCATION_ATTEMPTS`]
    ///   collisions in a row
    /// - store and cancellation errors from the claim, propagated as-is
    pub async fn allocate(
        &self,
        long_url: &LongUrl,
        expires_at: DateTime<Utc>,
        guard: &CallGuard,
    ) -> Result<LinkRecord, AppError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let identifier = self.draw();
            let key = identifier.short_key();

            let claimed = guard
                .run(
                    "CLAIM",
                    self.store
                        .claim_link(&key, LINK_URL_FIELD, long_url.as_str(), expires_at),
                )
                .await?;

            if claimed {
                debug!("Claimed {} for {} (attempt {})", key, long_url, attempt);
                return Ok(LinkRecord::new(identifier, long_url.clone(), expires_at));
            }

            debug!("Identifier collision on {}", key);
        }

        warn!(
            "Gave up allocating an identifier for {} after {} collisions",
            long_url, MAX_ALLOCATION_ATTEMPTS
        );
        Err(AppError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Reports whether `identifier` is currently committed as a short key.
    ///
    /// # Errors
    ///
    /// Store failures are returned, never read as "unused".
    pub async fn is_used(&self, identifier: Identifier, guard: &CallGuard) -> Result<bool, AppError> {
        guard
            .run("EXISTS", self.store.exists(&identifier.short_key()))
            .await
    }

    fn draw(&self) -> Identifier {
        loop {
            let candidate = self.source.next_id();
            if candidate != 0 {
                return Identifier::new(candidate);
            }
        }
    }
}
