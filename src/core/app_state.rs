use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{LocationStore, ProductStore};
use crate::core::types::SearchResponse;

/// Shared per-process state. The stores are explicitly constructed and
/// injected at startup, never module-level singletons.
#[derive(Clone)]
pub struct AppState {
    pub locations: Arc<dyn LocationStore>,
    pub products: Arc<dyn ProductStore>,
    /// Search responses keyed by normalized query. `None` when caching
    /// is disabled (cache TTL configured to 0).
    pub search_cache: Option<moka::future::Cache<String, SearchResponse>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cache_enabled", &self.search_cache.is_some())
            .finish()
    }
}

impl AppState {
    pub fn new(locations: Arc<dyn LocationStore>, products: Arc<dyn ProductStore>) -> Self {
        Self {
            locations,
            products,
            search_cache: None,
        }
    }

    pub fn with_cache(mut self, ttl: Duration, capacity: u64) -> Self {
        if ttl.is_zero() {
            self.search_cache = None;
            return self;
        }
        self.search_cache = Some(
            moka::future::Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        );
        self
    }
}
