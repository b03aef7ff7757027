use crate::{
    cache::{MemoryPageCache, PageCache},
    config::Config,
    store::Store,
};
use std::sync::Arc;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Cloned into every handler; all fields are `Arc`s so cloning is cheap.
///
/// The page cache sits behind a trait object so a different backend can be
/// swapped in without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub cache: Arc<dyn PageCache>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let cache = MemoryPageCache::new(config.index_cache_capacity, config.index_cache_ttl);
        Self::with_cache(config, Arc::new(cache))
    }

    pub fn with_cache(config: Config, cache: Arc<dyn PageCache>) -> Self {
        Self {
            store: Arc::new(Store::new()),
            cache,
            config: Arc::new(config),
        }
    }
}
