//! Retry and timeout policies
//!
//! Two policies are layered around each page:
//! - the per-page timeout bounds the whole unit of work (fetch, select,
//!   visitor, link extraction) and is non-fatal when it expires
//! - the retry policy wraps only the raw HTTP call and retries transient
//!   failures with decorrelated-jitter backoff
//!
//! Both race the crawl's cancellation token.

use crate::config::RetryConfig;
use crate::crawler::transport::{HttpResponse, TransportError};
use crate::CrawlError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Result of one raw HTTP attempt
pub type AttemptResult = Result<HttpResponse, TransportError>;

/// Bounded retry with decorrelated-jitter backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    median_first_delay: Duration,
    max_delay: Duration,
    retry_on_not_found: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Creates a policy; 404 is treated as transient unless disabled with
    /// [`with_retry_on_not_found`](Self::with_retry_on_not_found)
    pub fn new(max_retries: u32, median_first_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            median_first_delay,
            max_delay: max_delay.max(median_first_delay),
            retry_on_not_found: true,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.median_first_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
        .with_retry_on_not_found(config.retry_on_not_found)
    }

    /// A policy that retries immediately, for tests and local mirrors
    pub fn without_delay(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_retry_on_not_found(mut self, retry: bool) -> Self {
        self.retry_on_not_found = retry;
        self
    }

    /// Returns true if the attempt should be retried
    ///
    /// Transient: any transport error, 408, 5xx, and 404 when enabled.
    pub fn is_transient(&self, outcome: &AttemptResult) -> bool {
        match outcome {
            Err(_) => true,
            Ok(response) => match response.status {
                408 => true,
                404 => self.retry_on_not_found,
                status => (500..600).contains(&status),
            },
        }
    }

    /// Computes the delay before the next retry
    ///
    /// The first delay is drawn from `[median/2, median*3/2]`; later delays
    /// from `[median, previous*3]`. Every delay is capped at the max delay.
    pub fn next_delay(&self, previous: Option<Duration>, rng: &mut fastrand::Rng) -> Duration {
        let median = duration_micros(self.median_first_delay);
        if median == 0 {
            return Duration::ZERO;
        }

        let micros = match previous {
            None => rng.u64(median / 2..=median + median / 2),
            Some(prev) => {
                let upper = duration_micros(prev).saturating_mul(3).max(median);
                rng.u64(median..=upper)
            }
        };

        Duration::from_micros(micros).min(self.max_delay)
    }

    /// Runs `attempt` until it succeeds, fails permanently, or retries run out
    ///
    /// The final attempt's outcome is returned as-is, transient or not. Only
    /// cancellation turns into an error.
    pub async fn execute<F, Fut>(
        &self,
        url: &Url,
        cancel: &CancellationToken,
        mut attempt: F,
    ) -> crate::Result<AttemptResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AttemptResult>,
    {
        let mut rng = fastrand::Rng::new();
        let mut previous = None;
        let mut retries = 0;

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
                outcome = attempt() => outcome,
            };

            if retries >= self.max_retries || !self.is_transient(&outcome) {
                return Ok(outcome);
            }

            let delay = self.next_delay(previous, &mut rng);
            previous = Some(delay);
            retries += 1;

            tracing::debug!(
                "Transient failure for {} ({}), retry {}/{} in {:?}",
                url,
                describe(&outcome),
                retries,
                self.max_retries,
                delay
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

/// Outcome of a unit of work run under the per-page timeout
#[derive(Debug, PartialEq, Eq)]
pub enum PageOutcome<T> {
    Completed(T),
    TimedOut,
}

/// Runs `work` bounded by `timeout`
///
/// On expiry the work future is dropped, which abandons any in-flight request,
/// and `PageOutcome::TimedOut` is returned. Errors from `work` (visitor
/// failure, cancellation) are passed through unchanged.
pub async fn run_with_timeout<T, F>(
    timeout: Duration,
    cancel: &CancellationToken,
    work: F,
) -> crate::Result<PageOutcome<T>>
where
    F: Future<Output = crate::Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CrawlError::Cancelled),
        result = tokio::time::timeout(timeout, work) => match result {
            Ok(inner) => inner.map(PageOutcome::Completed),
            Err(_) => Ok(PageOutcome::TimedOut),
        },
    }
}

fn duration_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

fn describe(outcome: &AttemptResult) -> String {
    match outcome {
        Ok(response) => format!("HTTP {}", response.status),
        Err(e) => e.to_string(),
    }
}
