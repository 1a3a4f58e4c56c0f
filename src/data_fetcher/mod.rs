pub mod api;
pub mod cache;
pub mod decoder;
pub mod models;

pub use api::{RetryPolicy, RetryingFetcher, SleeperApi};
pub use cache::Caches;
pub use decoder::ResponseDecoder;
pub use models::{League, NflState};
