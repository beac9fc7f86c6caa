//! Time-boxed, retried document fetching.
//!
//! The engine never talks to a registry itself. Callers plug in a
//! [`DocumentProvider`]; the [`Fetcher`] wraps it with a per-attempt
//! timeout, bounded exponential backoff and a concurrency limit.

use super::CancellationSignal;
use crate::error::{AibomDiffError, Result};
use crate::parsers::check_file_size;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use xxhash_rust::xxh3::xxh3_64;

/// Unparsed document content plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Identifier shown in results (file path, model id, ...)
    pub label: String,
    pub content: String,
}

impl RawDocument {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }
}

/// Source of AIBOM documents.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Fetch the raw document for a subject.
    async fn fetch(&self, subject: &str) -> Result<RawDocument>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Reads documents from the local filesystem; subjects are paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileProvider;

#[async_trait]
impl DocumentProvider for FileProvider {
    async fn fetch(&self, subject: &str) -> Result<RawDocument> {
        let metadata = tokio::fs::metadata(subject)
            .await
            .map_err(|e| AibomDiffError::io(subject, e))?;
        check_file_size(Path::new(subject), metadata.len())?;
        let content = tokio::fs::read_to_string(subject)
            .await
            .map_err(|e| AibomDiffError::io(subject, e))?;
        Ok(RawDocument::new(subject, content))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Bounded exponential backoff with deterministic jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// `base * 2^(retry-1)` plus up to 50% jitter derived from the subject
    /// and retry number, capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, subject: &str, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(1 << exp).min(self.max_delay);
        let hash = xxh3_64(format!("{subject}:{retry}").as_bytes());
        let jitter_fraction = (hash % 1000) as f64 / 2000.0;
        backoff
            .saturating_add(backoff.mul_f64(jitter_fraction))
            .min(self.max_delay)
    }
}

/// Wraps a provider with timeouts, retries and a concurrency limit.
pub struct Fetcher {
    provider: Arc<dyn DocumentProvider>,
    timeout: Duration,
    retry: RetryPolicy,
    semaphore: Arc<Semaphore>,
}

impl Fetcher {
    pub fn new(
        provider: Arc<dyn DocumentProvider>,
        timeout: Duration,
        max_parallel: usize,
    ) -> Self {
        Self {
            provider,
            timeout,
            retry: RetryPolicy::default(),
            semaphore: Arc::new(Semaphore::new(max_parallel.max(1))),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch one subject, retrying retryable failures.
    ///
    /// After the last attempt, a run of timeouts surfaces as
    /// [`AibomDiffError::Timeout`]; any other failure is returned as is.
    pub async fn fetch_one(&self, subject: &str) -> Result<RawDocument> {
        let attempts = self.retry.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                let delay = self.retry.delay_for(subject, attempt - 1);
                tracing::debug!(
                    subject,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying fetch"
                );
                tokio::time::sleep(delay).await;
            }

            match tokio::time::timeout(self.timeout, self.provider.fetch(subject)).await {
                Ok(Ok(doc)) => return Ok(doc),
                Ok(Err(e)) if !e.is_retryable() => return Err(e),
                Ok(Err(e)) => {
                    tracing::warn!(subject, attempt, error = %e, "Fetch attempt failed");
                    last_error = Some(e);
                }
                Err(_) => {
                    tracing::warn!(
                        subject,
                        attempt,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Fetch attempt timed out"
                    );
                    last_error = Some(AibomDiffError::Timeout {
                        subject: subject.to_string(),
                        attempts,
                        per_attempt: self.timeout,
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AibomDiffError::Provider {
            subject: subject.to_string(),
            message: "no attempt was made".to_string(),
        }))
    }

    /// Fetch every subject concurrently, bounded by the semaphore.
    ///
    /// Results keep the order of `subjects`. Subjects that have not started
    /// when `cancel` fires are reported as cancelled.
    pub async fn fetch_all(
        &self,
        subjects: &[String],
        cancel: &CancellationSignal,
    ) -> Vec<Result<RawDocument>> {
        let tasks = subjects.iter().map(|subject| async move {
            let _permit = match self.semaphore.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    return Err(AibomDiffError::Provider {
                        subject: subject.clone(),
                        message: format!("semaphore closed: {e}"),
                    })
                }
            };
            if cancel.is_cancelled() {
                return Err(AibomDiffError::Cancelled(format!("fetch of {subject}")));
            }
            tracing::debug!(
                subject = %subject,
                provider = self.provider.name(),
                "Fetching document"
            );
            self.fetch_one(subject).await
        });
        futures::future::join_all(tasks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parsers::MAX_AIBOM_FILE_SIZE;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with a provider error a fixed number of times, then succeeds.
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl DocumentProvider for FlakyProvider {
        async fn fetch(&self, subject: &str) -> Result<RawDocument> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(AibomDiffError::Provider {
                    subject: subject.to_string(),
                    message: "503".to_string(),
                })
            } else {
                Ok(RawDocument::new(subject, "{}"))
            }
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl DocumentProvider for SlowProvider {
        async fn fetch(&self, subject: &str) -> Result<RawDocument> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(RawDocument::new(subject, "{}"))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn test_delay_is_bounded_and_deterministic() {
        let policy = RetryPolicy::default();
        for retry in 1..=10 {
            let d = policy.delay_for("org/model", retry);
            assert!(d <= policy.max_delay);
            assert_eq!(d, policy.delay_for("org/model", retry));
        }
        let first = policy.delay_for("org/model", 1);
        assert!(first >= Duration::from_secs(1));
        assert!(first <= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let provider = Arc::new(FlakyProvider {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let fetcher =
            Fetcher::new(provider.clone(), Duration::from_secs(1), 2).with_retry(fast_retry());
        let doc = fetcher.fetch_one("org/model").await.unwrap();
        assert_eq!(doc.label, "org/model");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let provider = Arc::new(FlakyProvider {
            failures: 10,
            calls: AtomicU32::new(0),
        });
        let fetcher =
            Fetcher::new(provider.clone(), Duration::from_secs(1), 2).with_retry(fast_retry());
        let err = fetcher.fetch_one("org/model").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_surfaces_after_retries() {
        let fetcher = Fetcher::new(Arc::new(SlowProvider), Duration::from_millis(10), 2)
            .with_retry(fast_retry());
        match fetcher.fetch_one("org/slow").await {
            Err(AibomDiffError::Timeout { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("Expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_not_retried() {
        let fetcher = Fetcher::new(Arc::new(FileProvider), Duration::from_secs(1), 1);
        let err = fetcher.fetch_one("/nonexistent/aibom.json").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[tokio::test]
    async fn test_file_provider_rejects_oversized_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_AIBOM_FILE_SIZE + 1).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let err = FileProvider.fetch(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("64 MB limit"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_order_and_honors_cancel() {
        let provider = Arc::new(FlakyProvider {
            failures: 0,
            calls: AtomicU32::new(0),
        });
        let fetcher = Fetcher::new(provider, Duration::from_secs(1), 2);
        let subjects = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let results = fetcher.fetch_all(&subjects, &CancellationSignal::new()).await;
        let labels: Vec<_> = results
            .iter()
            .map(|r| r.as_ref().map(|d| d.label.clone()).unwrap_or_default())
            .collect();
        assert_eq!(labels, subjects);

        let cancelled = CancellationSignal::new();
        cancelled.cancel();
        let results = fetcher.fetch_all(&subjects, &cancelled).await;
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(AibomDiffError::Cancelled(_)))));
    }
}
