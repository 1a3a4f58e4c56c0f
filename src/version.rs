//! Update check against a remote version endpoint.

use semver::Version;
use serde_json::Value;
use tracing::{info, instrument};

use crate::constants::contexts;
use crate::data_fetcher::api::{RetryingFetcher, Transport};
use crate::data_fetcher::decoder::ResponseDecoder;
use crate::error::AppError;

/// Version of the running binary.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns `true` when the endpoint at `url` advertises a version strictly
/// newer than `current_version`.
///
/// Every failure is reported under the `version check` context and yields
/// `false`, so a broken endpoint never nags the user.
#[instrument(skip(fetcher))]
pub async fn check_for_update<T: Transport>(
    fetcher: &RetryingFetcher<T>,
    url: &str,
    current_version: &str,
) -> bool {
    let reporter = fetcher.reporter();
    let outcome = async {
        let latest = fetch_latest_version(fetcher, url).await?;
        let current = Version::parse(current_version)?;
        Ok::<_, AppError>((latest, current))
    }
    .await;

    match outcome {
        Ok((latest, current)) => {
            let needs_update = latest > current;
            info!("Latest version {latest}, running {current}, update needed: {needs_update}");
            needs_update
        }
        Err(e) => reporter.report_with_fallback(&e, contexts::VERSION_CHECK, false),
    }
}

/// Fetches the latest published version from `url`.
///
/// The body is either a bare JSON string (`"1.2.3"`) or the crates.io crate
/// document, read from `crate.max_stable_version`.
pub async fn fetch_latest_version<T: Transport>(
    fetcher: &RetryingFetcher<T>,
    url: &str,
) -> Result<Version, AppError> {
    let context = contexts::VERSION_CHECK;
    let response = fetcher
        .retrying_fetch(url)
        .await
        .map_err(|_| AppError::retries_exhausted(url, fetcher.policy().max_retries))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::from_status(status, url));
    }

    let decoder = ResponseDecoder::new(fetcher.reporter());
    let value = decoder
        .safe_json_parse(response, context)
        .await
        .map_err(|_| {
            AppError::api_malformed_json("Version response could not be decoded", context)
        })?;

    let raw = extract_version(&value).ok_or_else(|| {
        AppError::api_unexpected_structure("Version response has no version string", context)
    })?;
    Ok(Version::parse(raw.trim())?)
}

fn extract_version(value: &Value) -> Option<&str> {
    value.as_str().or_else(|| {
        value
            .get("crate")
            .and_then(|c| c.get("max_stable_version"))
            .and_then(Value::as_str)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;
    use crate::data_fetcher::api::RetryPolicy;
    use crate::data_fetcher::api::http_client::{ReqwestTransport, create_test_http_client};
    use crate::error_handler::FailureReporter;
    use crate::testing_utils::{ScriptedOutcome, ScriptedTransport};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scripted_fetcher(
        outcomes: Vec<ScriptedOutcome>,
    ) -> (RetryingFetcher<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(outcomes));
        (
            RetryingFetcher::new(transport.clone(), FailureReporter::new(ExecutionMode::Test)),
            transport,
        )
    }

    #[test]
    fn test_extract_version_shapes() {
        assert_eq!(extract_version(&json!("1.2.3")), Some("1.2.3"));
        assert_eq!(
            extract_version(&json!({ "crate": { "max_stable_version": "0.4.0" } })),
            Some("0.4.0")
        );
        assert_eq!(extract_version(&json!({ "crate": {} })), None);
        assert_eq!(extract_version(&json!(42)), None);
    }

    #[tokio::test]
    async fn test_newer_crates_io_version_needs_update() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/crates/sleeper_fetch"))
            .and(header(
                "user-agent",
                format!("sleeper_fetch/{CURRENT_VERSION}").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "crate": { "name": "sleeper_fetch", "max_stable_version": "99.0.0" }
            })))
            .mount(&mock_server)
            .await;

        let fetcher = RetryingFetcher::with_policy(
            ReqwestTransport::new(create_test_http_client()),
            FailureReporter::new(ExecutionMode::Test),
            RetryPolicy {
                max_retries: 3,
                base_delay: std::time::Duration::ZERO,
            },
        );
        let url = format!("{}/api/v1/crates/sleeper_fetch", mock_server.uri());
        assert!(check_for_update(&fetcher, &url, CURRENT_VERSION).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_or_older_version_needs_no_update() {
        let (fetcher, _) = scripted_fetcher(vec![
            ScriptedOutcome::json(200, r#""1.2.3""#),
            ScriptedOutcome::json(200, r#""1.0.0""#),
        ]);

        assert!(!check_for_update(&fetcher, "http://v.test", "1.2.3").await);
        assert!(!check_for_update(&fetcher, "http://v.test", "1.2.3").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bare_string_newer_version() {
        let (fetcher, _) = scripted_fetcher(vec![ScriptedOutcome::json(200, r#""2.0.0""#)]);
        assert!(check_for_update(&fetcher, "http://v.test", "1.9.9").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_fall_back_to_false() {
        let cases = [
            ScriptedOutcome::json(500, "oops"),
            ScriptedOutcome::json(200, "not json"),
            ScriptedOutcome::json(200, r#"{"unexpected": true}"#),
            ScriptedOutcome::json(200, r#""not-a-version""#),
        ];

        for case in cases {
            let (fetcher, transport) = scripted_fetcher(vec![case.clone()]);
            assert!(
                !check_for_update(&fetcher, "http://v.test", "0.1.0").await,
                "case {case:?}"
            );
            assert_eq!(transport.calls(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_endpoint_falls_back_to_false() {
        let (fetcher, transport) = scripted_fetcher(vec![]);
        assert!(!check_for_update(&fetcher, "http://v.test", "0.1.0").await);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparsable_current_version_falls_back_to_false() {
        let (fetcher, _) = scripted_fetcher(vec![ScriptedOutcome::json(200, r#""1.0.0""#)]);
        assert!(!check_for_update(&fetcher, "http://v.test", "dev").await);
    }
}
