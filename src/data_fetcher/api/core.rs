use serde_json::Value;
use tracing::{debug, error, info, instrument};

use super::fetch_utils::RetryingFetcher;
use super::http_client::{ReqwestTransport, Transport};
use crate::config::Config;
use crate::data_fetcher::cache::{Caches, EntityCache};
use crate::data_fetcher::decoder::ResponseDecoder;
use crate::data_fetcher::models::Payload;
use crate::error::AppError;
use crate::error_handler::{ErrorEnvelope, FailureReporter};

/// Data accessors for the Sleeper API.
///
/// Every accessor runs the same pipeline: cache check, retrying fetch, status
/// check, JSON decode, validation, cache write. Any failure along the way is
/// reported once, here, and the caller receives an [`ErrorEnvelope`].
///
/// The caches are injected so that callers decide their lifetime and can
/// inspect them.
#[derive(Debug, Clone)]
pub struct SleeperApi<T = ReqwestTransport> {
    pub(super) api_base_url: String,
    pub(super) caches: Caches,
    fetcher: RetryingFetcher<T>,
    decoder: ResponseDecoder,
    reporter: FailureReporter,
}

impl SleeperApi<ReqwestTransport> {
    /// Builds the accessors from configuration with a reqwest transport.
    pub fn from_config(config: &Config, caches: Caches) -> Result<Self, AppError> {
        let reporter = FailureReporter::new(config.execution_mode);
        let transport = ReqwestTransport::with_timeout(config.http_timeout_seconds)?;
        Ok(Self::new(
            config.api_base_url.clone(),
            RetryingFetcher::new(transport, reporter),
            caches,
        ))
    }
}

impl<T: Transport> SleeperApi<T> {
    pub fn new(
        api_base_url: impl Into<String>,
        fetcher: RetryingFetcher<T>,
        caches: Caches,
    ) -> Self {
        let reporter = fetcher.reporter();
        Self {
            api_base_url: api_base_url.into(),
            caches,
            fetcher,
            decoder: ResponseDecoder::new(reporter),
            reporter,
        }
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    pub fn fetcher(&self) -> &RetryingFetcher<T> {
        &self.fetcher
    }

    /// Returns the cached payload for `key` or runs the fetch pipeline and
    /// caches its result. Concurrent misses for one key are not coalesced.
    #[instrument(skip(self, cache))]
    pub(super) async fn cached_or_fetch<P: Payload>(
        &self,
        cache: &EntityCache<P>,
        key: &str,
        url: &str,
        decode_context: &str,
        context: &str,
    ) -> Result<P, ErrorEnvelope> {
        if let Some(cached) = cache.read(key).await {
            debug!("Serving {key} from cache");
            return Ok(cached);
        }

        match self.fetch_payload::<P>(url, decode_context).await {
            Ok(payload) => {
                cache.write(key, payload.clone()).await;
                info!("Fetched and cached {key}");
                Ok(payload)
            }
            Err(e) => Err(self.reporter.report(&e, context)),
        }
    }

    /// Fetch, status check, decode and validation, without touching a cache.
    async fn fetch_payload<P: Payload>(&self, url: &str, context: &str) -> Result<P, AppError> {
        let response = self
            .fetcher
            .retrying_fetch(url)
            .await
            .map_err(|_| AppError::retries_exhausted(url, self.fetcher.policy().max_retries))?;

        let status = response.status();
        if !status.is_success() {
            let body = self.decoder.safe_text_parse(response, context).await;
            let preview: String = body.chars().take(200).collect();
            error!(
                "HTTP {} - {} (URL: {}) body: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error"),
                url,
                preview
            );
            return Err(AppError::from_status(status, url));
        }

        let value = self
            .decoder
            .safe_json_parse(response, context)
            .await
            .map_err(|_| {
                AppError::api_malformed_json("Response body could not be decoded", context)
            })?;

        decode_payload(value, context)
    }
}

/// Turns a decoded JSON value into a validated payload.
///
/// A value carrying `"error": true` is a failure even when it would otherwise
/// match the schema.
pub(crate) fn decode_payload<P: Payload>(value: Value, context: &str) -> Result<P, AppError> {
    if ErrorEnvelope::is_error_value(&value) {
        return Err(AppError::api_error_payload(context));
    }

    let payload: P = serde_json::from_value(value)
        .map_err(|e| AppError::api_unexpected_structure(e.to_string(), context))?;
    payload
        .validate()
        .map_err(|message| AppError::api_unexpected_structure(message, context))?;

    Ok(payload)
}
