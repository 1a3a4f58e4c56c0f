//! HTTP client creation and the transport seam used by the retrying fetcher

use reqwest::{Client, Response};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::AppError;

/// Performs a single GET. Implementations report transport-level failures as
/// errors and hand back every completed response, whatever its status.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, AppError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, AppError>> + Send {
        (**self).get(url)
    }
}

/// Creates a properly configured HTTP client with connection pooling and timeout handling.
///
/// # Features
/// * Configurable timeout for requests (default: 30 seconds, configurable via config/env)
/// * Connection pooling with centralized pool size configuration
/// * `sleeper_fetch/<version>` user agent
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
        .build()
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout_seconds: u64) -> Result<Self, AppError> {
        Ok(Self::new(create_http_client_with_timeout(timeout_seconds)?))
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Response, AppError> {
        debug!("GET {url}");
        self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::network_timeout(url)
            } else if e.is_connect() {
                AppError::network_connection(url, e.to_string())
            } else {
                AppError::ApiFetch(e)
            }
        })
    }
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS)
        .expect("Failed to create test HTTP client")
}
