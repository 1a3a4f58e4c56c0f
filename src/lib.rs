//! Sleeper API Fetch Library
//!
//! Resilient access to the Sleeper fantasy football API: league metadata and
//! the current NFL season state. Transport failures are retried with
//! exponential backoff, successful payloads are cached for the lifetime of the
//! cache, and every failure reaches the caller as an [`ErrorEnvelope`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use sleeper_fetch::config::Config;
//! use sleeper_fetch::data_fetcher::{Caches, SleeperApi};
//! use sleeper_fetch::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let api = SleeperApi::from_config(&config, Caches::new())?;
//!
//!     match api.get_nfl_state().await {
//!         Ok(state) => println!("Week {} of {}", state.week, state.season),
//!         Err(envelope) => eprintln!("{}", envelope.context),
//!     }
//!
//!     // Served from the cache, no second request
//!     let _ = api.get_nfl_state().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod error_handler;
pub mod logging;
pub mod testing_utils;
pub mod version;

// Re-export commonly used types for convenience
pub use config::{Config, ExecutionMode};
pub use data_fetcher::api::{RetryPolicy, RetryingFetcher, SleeperApi, Transport};
pub use data_fetcher::cache::{Caches, EntityCache};
pub use data_fetcher::models::{League, NflState, Payload};
pub use error::{AppError, FailureKind};
pub use error_handler::{ErrorEnvelope, FailureReporter, Reported};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
