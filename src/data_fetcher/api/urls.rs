//! URL building utilities for API endpoints

/// Joins an endpoint path onto the API base URL.
///
/// # Example
/// ```
/// use sleeper_fetch::data_fetcher::api::build_api_url;
///
/// let url = build_api_url("https://api.sleeper.app/v1/", "/state/nfl");
/// assert_eq!(url, "https://api.sleeper.app/v1/state/nfl");
/// ```
pub fn build_api_url(api_base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        api_base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Builds the URL for a single league's metadata.
///
/// # Example
/// ```
/// use sleeper_fetch::data_fetcher::api::build_league_url;
///
/// let url = build_league_url("https://api.sleeper.app/v1", "289646328504385536");
/// assert_eq!(url, "https://api.sleeper.app/v1/league/289646328504385536");
/// ```
pub fn build_league_url(api_base_url: &str, league_id: &str) -> String {
    build_api_url(api_base_url, &format!("league/{league_id}"))
}

/// Builds the URL for the current NFL season state.
///
/// # Example
/// ```
/// use sleeper_fetch::data_fetcher::api::build_nfl_state_url;
///
/// let url = build_nfl_state_url("https://api.sleeper.app/v1");
/// assert_eq!(url, "https://api.sleeper.app/v1/state/nfl");
/// ```
pub fn build_nfl_state_url(api_base_url: &str) -> String {
    build_api_url(api_base_url, "state/nfl")
}
