//! Test doubles for the fetch pipeline.

use http::StatusCode;
use reqwest::Response;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::data_fetcher::api::Transport;
use crate::error::AppError;

/// One scripted reply of a [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// A completed response with this status and body.
    Respond { status: u16, body: Vec<u8> },
    /// A transport-level failure (connection refused). Retryable.
    Fail,
    /// A failure raised before the request left, which is not retried.
    Reject,
}

impl ScriptedOutcome {
    pub fn json(status: u16, body: &str) -> Self {
        Self::Respond {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::Respond {
            status,
            body: body.into(),
        }
    }
}

/// [`Transport`] that replays a fixed script and counts calls.
///
/// Once the script runs out every call fails at the transport level. Each
/// call yields to the scheduler once, so concurrent callers interleave the
/// way they would over a real network.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn always_failing() -> Self {
        Self::default()
    }

    /// Number of `get` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs requested so far, in call order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn next_outcome(&self, url: &str) -> ScriptedOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(ScriptedOutcome::Fail)
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<Response, AppError> {
        let outcome = self.next_outcome(url);
        tokio::task::yield_now().await;

        match outcome {
            ScriptedOutcome::Respond { status, body } => {
                let mut response = http::Response::new(body);
                *response.status_mut() =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Ok(Response::from(response))
            }
            ScriptedOutcome::Fail => Err(AppError::network_connection(
                url,
                "connection refused (scripted)",
            )),
            ScriptedOutcome::Reject => Err(AppError::config_error(format!(
                "request to {url} rejected (scripted)"
            ))),
        }
    }
}

/// Counts every `tracing` event emitted while installed as the default subscriber.
#[derive(Debug, Clone, Default)]
pub struct EventCounter {
    count: Arc<AtomicUsize>,
}

struct CountingLayer(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl EventCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the counter for the current thread until the guard drops.
    ///
    /// Use from a current-thread runtime so awaited work stays on this thread.
    pub fn set_default(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(CountingLayer(self.count.clone()));
        tracing::subscriber::set_default(subscriber)
    }

    /// Runs `f` with the counter installed and returns the events it emitted.
    pub fn count_during(f: impl FnOnce()) -> usize {
        let counter = Self::new();
        let _guard = counter.set_default();
        f();
        counter.count()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_script_then_fails() {
        let transport = ScriptedTransport::new([
            ScriptedOutcome::json(200, "{}"),
            ScriptedOutcome::Fail,
        ]);

        let first = transport.get("http://a").await.unwrap();
        assert_eq!(first.status().as_u16(), 200);
        assert!(transport.get("http://b").await.is_err());
        assert!(transport.get("http://c").await.is_err());

        assert_eq!(transport.calls(), 3);
        assert_eq!(
            transport.requested_urls(),
            vec!["http://a", "http://b", "http://c"]
        );
    }

    #[tokio::test]
    async fn test_rejected_request_is_not_retryable() {
        let transport = ScriptedTransport::new([ScriptedOutcome::Reject]);
        let error = transport.get("http://a").await.unwrap_err();
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_event_counter_counts_only_while_installed() {
        assert_eq!(EventCounter::count_during(|| tracing::warn!("one")), 1);

        let counter = EventCounter::new();
        {
            let _guard = counter.set_default();
            tracing::info!("two");
            tracing::error!("three");
        }
        tracing::info!("after the guard");
        assert_eq!(counter.count(), 2);
    }
}
