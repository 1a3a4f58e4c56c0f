use tracing::instrument;

use super::core::SleeperApi;
use super::http_client::Transport;
use super::urls::build_nfl_state_url;
use crate::constants::{cache_keys, contexts};
use crate::data_fetcher::models::NflState;
use crate::error_handler::ErrorEnvelope;

impl<T: Transport> SleeperApi<T> {
    /// Returns the current NFL season state, from cache when already fetched.
    ///
    /// There is a single state entry, so after the first success every call
    /// returns the same value without a network request for the lifetime of
    /// the cache.
    ///
    /// # Errors
    /// Returns an [`ErrorEnvelope`] with context `getNflState` on any failure.
    #[instrument(skip(self))]
    pub async fn get_nfl_state(&self) -> Result<NflState, ErrorEnvelope> {
        let url = build_nfl_state_url(&self.api_base_url);

        self.cached_or_fetch(
            &self.caches.nfl_state,
            cache_keys::NFL_STATE,
            &url,
            contexts::NFL_STATE_DECODE,
            contexts::NFL_STATE,
        )
        .await
    }
}
