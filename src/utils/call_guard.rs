//! Deadline and cancellation wrapper for store round trips.
//!
//! Every call the core makes to the key-value store runs through
//! [`CallGuard::run`], which races the call against a per-call timeout and
//! the caller's [`CancellationToken`]. Dropping the losing future aborts the
//! in-flight request.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::AppError;

/// Per-operation guard carrying the caller's cancellation token and the
/// store timeout.
#[derive(Debug, Clone)]
pub struct CallGuard {
    cancel: CancellationToken,
    timeout: Duration,
}

impl CallGuard {
    pub fn new(cancel: CancellationToken, timeout: Duration) -> Self {
        Self { cancel, timeout }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fails fast with [`AppError::Cancelled`] if the token already fired.
    ///
    /// Multi-step operations call this between writes.
    pub fn check(&self) -> Result<(), AppError> {
        if self.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Runs one store call under the guard.
    ///
    /// # Errors
    ///
    /// - [`AppError::Cancelled`] if the token fires first
    /// - [`AppError::StoreUnavailable`] if the timeout elapses first
    /// - whatever `call` itself returns otherwise
    pub async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.check()?;

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::Cancelled),
            outcome = tokio::time::timeout(self.timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => Err(AppError::store_unavailable(
                    operation,
                    format!("timed out after {}ms", self.timeout.as_millis()),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn guard(timeout_ms: u64) -> (CancellationToken, CallGuard) {
        let token = CancellationToken::new();
        let guard = CallGuard::new(token.clone(), Duration::from_millis(timeout_ms));
        (token, guard)
    }

    #[tokio::test]
    async fn test_passes_through_result() {
        let (_token, guard) = guard(1_000);

        let value = guard.run("GET", async { Ok::<_, AppError>(7) }).await;
        assert_eq!(value.unwrap(), 7);

        let err = guard
            .run("GET", async {
                Err::<(), _>(AppError::store_unavailable("GET", "boom"))
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls_call() {
        let (token, guard) = guard(1_000);
        token.cancel();
        let polled = AtomicBool::new(false);

        let err = guard
            .run("SET", async {
                polled.store(true, Ordering::SeqCst);
                Ok::<_, AppError>(())
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(!polled.load(Ordering::SeqCst));
        assert!(guard.check().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_in_flight_call() {
        let (token, guard) = guard(60_000);

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = guard
            .run("HGET", async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, AppError>(())
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        canceller.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_store_unavailable() {
        let (_token, guard) = guard(50);

        let err = guard
            .run("ZINCRBY", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, AppError>(())
            })
            .await
            .unwrap_err();

        match err {
            AppError::StoreUnavailable { operation, message } => {
                assert_eq!(operation, "ZINCRBY");
                assert!(message.contains("50ms"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
