pub mod entity_cache;

pub use entity_cache::EntityCache;

use crate::data_fetcher::models::{League, NflState};

/// The caches consulted by the data accessors, one per entity kind.
#[derive(Debug, Clone, Default)]
pub struct Caches {
    pub leagues: EntityCache<League>,
    pub nfl_state: EntityCache<NflState>,
}

impl Caches {
    pub fn new() -> Self {
        Self::default()
    }
}
