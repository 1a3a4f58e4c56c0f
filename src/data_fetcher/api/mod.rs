pub mod fetch_utils;
pub mod http_client;
pub mod urls;
mod core;
mod league;
mod nfl_state;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::{ReqwestTransport, Transport, create_http_client_with_timeout};
pub use fetch_utils::{RetryPolicy, RetryingFetcher};
// Re-export the data accessors
pub use core::SleeperApi;
