//! Application-wide constants and configuration values
//!
//! This module centralizes the magic numbers and fixed strings of the
//! fetch pipeline so that tests and the binary agree on them.

/// Default base URL of the Sleeper API
pub const DEFAULT_API_BASE_URL: &str = "https://api.sleeper.app/v1";

/// Default endpoint queried by the update check
pub const DEFAULT_VERSION_CHECK_URL: &str = "https://crates.io/api/v1/crates/sleeper_fetch";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 100;

/// Message carried by every error envelope
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while fetching data";

/// Retry configuration
pub mod retry {
    /// Maximum number of transport attempts per fetch
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds); attempt n waits 2^n * base
    pub const BASE_DELAY_MS: u64 = 1000;
}

/// Keys used in the entity caches
pub mod cache_keys {
    /// Season state has exactly one entry
    pub const NFL_STATE: &str = "nfl";
}

/// Diagnostic contexts attached to envelopes
pub mod contexts {
    pub const LEAGUE_DATA: &str = "getLeagueData";
    pub const LEAGUE_DATA_DECODE: &str = "league data";
    pub const NFL_STATE: &str = "getNflState";
    pub const NFL_STATE_DECODE: &str = "NFL state";
    pub const VERSION_CHECK: &str = "version check";
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API base URL override
    pub const API_BASE: &str = "SLEEPER_API_BASE";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "SLEEPER_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "SLEEPER_HTTP_TIMEOUT";

    /// Execution mode: development, production or test
    pub const EXECUTION_MODE: &str = "SLEEPER_ENV";
}
