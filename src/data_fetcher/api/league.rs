use tracing::instrument;

use super::core::SleeperApi;
use super::http_client::Transport;
use super::urls::build_league_url;
use crate::constants::contexts;
use crate::data_fetcher::models::League;
use crate::error_handler::ErrorEnvelope;

impl<T: Transport> SleeperApi<T> {
    /// Returns the league with `league_id`, from cache when already fetched.
    ///
    /// A successful fetch is cached for the lifetime of the cache; later calls
    /// for the same id make no network request. Failures are never cached.
    ///
    /// # Errors
    /// Returns an [`ErrorEnvelope`] with context `getLeagueData for {league_id}`
    /// when the fetch fails, the status is not 2xx, the body is not JSON, the
    /// body carries `"error": true` or it does not describe a league.
    #[instrument(skip(self))]
    pub async fn get_league_data(&self, league_id: &str) -> Result<League, ErrorEnvelope> {
        let url = build_league_url(&self.api_base_url, league_id);
        let decode_context = format!("{} for {league_id}", contexts::LEAGUE_DATA_DECODE);
        let context = format!("{} for {league_id}", contexts::LEAGUE_DATA);

        self.cached_or_fetch(&self.caches.leagues, league_id, &url, &decode_context, &context)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;
    use crate::data_fetcher::api::fetch_utils::{RetryPolicy, RetryingFetcher};
    use crate::data_fetcher::api::http_client::{ReqwestTransport, create_test_http_client};
    use crate::data_fetcher::cache::Caches;
    use crate::error_handler::FailureReporter;
    use crate::testing_utils::{ScriptedOutcome, ScriptedTransport};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LEAGUE_JSON: &str = r#"{
        "league_id": "289646328504385536",
        "name": "Dynasty Warriors",
        "season": "2024",
        "status": "in_season",
        "sport": "nfl",
        "total_rosters": 12
    }"#;

    fn scripted_api(
        outcomes: Vec<ScriptedOutcome>,
        mode: ExecutionMode,
    ) -> (SleeperApi<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(outcomes));
        let fetcher = RetryingFetcher::new(transport.clone(), FailureReporter::new(mode));
        (
            SleeperApi::new("http://sleeper.test/v1", fetcher, Caches::new()),
            transport,
        )
    }

    fn wiremock_api(base: &str) -> SleeperApi<ReqwestTransport> {
        let fetcher = RetryingFetcher::with_policy(
            ReqwestTransport::new(create_test_http_client()),
            FailureReporter::new(ExecutionMode::Test),
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::ZERO,
            },
        );
        SleeperApi::new(base, fetcher, Caches::new())
    }

    #[tokio::test]
    async fn test_fetches_and_caches_league() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/league/289646328504385536"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LEAGUE_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = wiremock_api(&mock_server.uri());
        let league = api.get_league_data("289646328504385536").await.unwrap();
        assert_eq!(league.name.as_deref(), Some("Dynasty Warriors"));
        assert_eq!(league.total_rosters, Some(12));

        // Served from cache; the mock expects exactly one request
        let again = api.get_league_data("289646328504385536").await.unwrap();
        assert_eq!(again, league);
        assert!(api.caches().leagues.contains_key("289646328504385536").await);
    }

    #[tokio::test]
    async fn test_not_found_is_reported_once_and_not_cached() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/league/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let api = wiremock_api(&mock_server.uri());
        let envelope = api.get_league_data("missing").await.unwrap_err();
        assert!(envelope.error);
        assert_eq!(envelope.context, "getLeagueData for missing");
        assert!(envelope.stack.is_none());

        // Failures are not cached, so a second call hits the network again
        assert!(api.get_league_data("missing").await.is_err());
        assert!(api.caches().leagues.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_body_is_rejected() {
        let (api, transport) = scripted_api(
            vec![ScriptedOutcome::json(200, "null")],
            ExecutionMode::Test,
        );

        let envelope = api.get_league_data("nope").await.unwrap_err();
        assert_eq!(envelope.context, "getLeagueData for nope");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_flag_body_is_rejected() {
        let (api, _) = scripted_api(
            vec![ScriptedOutcome::json(200, r#"{"error": true}"#)],
            ExecutionMode::Test,
        );

        let envelope = api.get_league_data("abc").await.unwrap_err();
        assert_eq!(envelope.context, "getLeagueData for abc");
        assert!(api.caches().leagues.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_json_is_rejected() {
        let (api, _) = scripted_api(
            vec![ScriptedOutcome::json(200, "<html>oops</html>")],
            ExecutionMode::Test,
        );

        let envelope = api.get_league_data("abc").await.unwrap_err();
        assert_eq!(envelope.message, "An error occurred while fetching data");
    }

    #[tokio::test(start_paused = true)]
    async fn test_development_mode_envelope_carries_stack() {
        let (api, _) = scripted_api(
            vec![ScriptedOutcome::json(500, "boom")],
            ExecutionMode::Development,
        );

        let envelope = api.get_league_data("abc").await.unwrap_err();
        let stack = envelope.stack.expect("development envelopes carry a stack");
        assert!(stack.contains("500"), "stack was {stack}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_error_body_still_yields_envelope() {
        let (api, transport) = scripted_api(
            vec![ScriptedOutcome::bytes(502, vec![0xff, 0xfe, 0xfd])],
            ExecutionMode::Development,
        );

        let envelope = api.get_league_data("abc").await.unwrap_err();
        assert_eq!(envelope.context, "getLeagueData for abc");
        assert!(envelope.stack.is_some_and(|stack| stack.contains("502")));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_reported_under_accessor_context() {
        let transport = Arc::new(ScriptedTransport::always_failing());
        let fetcher = RetryingFetcher::new(
            transport.clone(),
            FailureReporter::new(ExecutionMode::Test),
        );
        let api = SleeperApi::new("http://sleeper.test/v1", fetcher, Caches::new());

        let envelope = api.get_league_data("abc").await.unwrap_err();
        assert_eq!(envelope.context, "getLeagueData for abc");
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            transport.requested_urls()[0],
            "http://sleeper.test/v1/league/abc"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_are_not_coalesced() {
        let (api, transport) = scripted_api(
            vec![
                ScriptedOutcome::json(200, r#"{"league_id":"abc","name":"first"}"#),
                ScriptedOutcome::json(200, r#"{"league_id":"abc","name":"second"}"#),
            ],
            ExecutionMode::Test,
        );

        let (a, b) = tokio::join!(api.get_league_data("abc"), api.get_league_data("abc"));
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(transport.calls(), 2);
        assert_eq!(api.caches().leagues.len().await, 1);

        // Whichever write landed last is what later reads see
        let cached = api.get_league_data("abc").await.unwrap();
        assert!(matches!(cached.name.as_deref(), Some("first") | Some("second")));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_league_id_has_its_own_entry() {
        let (api, transport) = scripted_api(
            vec![
                ScriptedOutcome::json(200, r#"{"league_id":"one"}"#),
                ScriptedOutcome::json(200, r#"{"league_id":"two"}"#),
            ],
            ExecutionMode::Test,
        );

        assert_eq!(api.get_league_data("one").await.unwrap().league_id, "one");
        assert_eq!(api.get_league_data("two").await.unwrap().league_id, "two");
        assert_eq!(api.get_league_data("one").await.unwrap().league_id, "one");
        assert_eq!(transport.calls(), 2);
    }
}
