//! Network fetching with bounded exponential backoff

use reqwest::Response;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::http_client::{ReqwestTransport, Transport};
use crate::constants::retry;
use crate::error_handler::{ErrorEnvelope, FailureReporter};

/// How transport failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Transport attempts before giving up.
    pub max_retries: u32,
    /// Delay before attempt 0; attempt n waits `2^n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay applied before attempt `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Sum of every backoff delay when all attempts fail.
    pub fn worst_case_delay(&self) -> Duration {
        (0..self.max_retries)
            .map(|attempt| self.delay_for_attempt(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Fetches a URL, retrying transport failures with exponential backoff.
///
/// Every attempt, the first included, waits its backoff delay before the
/// request goes out, so the default policy makes at most 3 requests with 1s,
/// 2s and 4s of waiting. A completed response is returned as-is whatever its
/// status; only retryable transport failures lead to another attempt. When the
/// attempts run out the failure is reported and an [`ErrorEnvelope`] is
/// returned.
#[derive(Debug, Clone)]
pub struct RetryingFetcher<T = ReqwestTransport> {
    transport: T,
    policy: RetryPolicy,
    reporter: FailureReporter,
}

impl<T: Transport> RetryingFetcher<T> {
    pub fn new(transport: T, reporter: FailureReporter) -> Self {
        Self::with_policy(transport, reporter, RetryPolicy::default())
    }

    pub fn with_policy(transport: T, reporter: FailureReporter, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            reporter,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn reporter(&self) -> FailureReporter {
        self.reporter
    }

    #[instrument(skip(self))]
    pub async fn retrying_fetch(&self, url: &str) -> Result<Response, ErrorEnvelope> {
        info!("Fetching data from URL: {url}");

        let mut attempts = 0u32;
        loop {
            let delay = self.policy.delay_for_attempt(attempts);
            debug!(
                "Waiting {:?} before attempt {}/{} for {}",
                delay,
                attempts + 1,
                self.policy.max_retries,
                url
            );
            tokio::time::sleep(delay).await;

            let error = match self.transport.get(url).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };
            attempts += 1;

            if !error.is_retryable() || attempts >= self.policy.max_retries {
                error!("Request failed for URL {}: {}", url, error);
                let context = format!("Fetch failed for {url} after {attempts} retries");
                return Err(self.reporter.report(&error, &context));
            }

            warn!(
                "Request error {} for {}. Retrying (attempt {}/{})",
                error,
                url,
                attempts + 1,
                self.policy.max_retries
            );
        }
    }
}
