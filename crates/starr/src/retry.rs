//! Retry support for transient transport failures.
//!
//! The pagination layer never retries on its own; retries live here, below
//! the page-fetch boundary, and are opt-in through `Config::max_retries`.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tokio_util::sync::CancellationToken;

use crate::error::{StarrError, short_error_message};

/// Initial delay between retries.
pub const INITIAL_BACKOFF_MS: u64 = 500;

/// Upper bound for a single backoff delay.
pub const MAX_BACKOFF_MS: u64 = 10_000;

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            max_retries: 3,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Default delays with a custom attempt budget.
    #[must_use]
    pub fn with_max_retries(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Set whether to use jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.with_jitter = jitter;
        self
    }

    /// Build an exponential backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// Build the default exponential backoff strategy.
#[must_use]
pub fn default_backoff() -> ExponentialBuilder {
    RetryConfig::default().into_backoff()
}

/// Run `operation`, retrying while it fails with a transient error.
///
/// `label` identifies the request in log output. Cancellation and every
/// non-transient error are returned on the first attempt. When `cancel` fires,
/// including during a backoff sleep, the call returns
/// [`StarrError::Cancelled`] at once.
pub async fn with_retry<T, F, Fut>(
    mut operation: F,
    config: RetryConfig,
    label: &str,
    cancel: &CancellationToken,
) -> Result<T, StarrError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StarrError>>,
{
    let attempt = AtomicU32::new(0);

    let retry_op = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    let retrying = retry_op
        .retry(config.into_backoff())
        .notify(|err: &StarrError, dur: Duration| {
            tracing::warn!(
                request = %label,
                attempt = attempt.load(Ordering::SeqCst),
                retry_in = ?dur,
                "Transient failure, retrying: {}",
                short_error_message(err)
            );
        })
        .when(StarrError::is_transient);

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StarrError::Cancelled),
        result = retrying => result,
    }
}
