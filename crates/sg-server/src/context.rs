//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use sg_cache::{CacheAside, CacheHandle};
use sg_core::config::Config;
use sg_core::SnapshotFetcher;

/// Cheaply cloneable because it only holds `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Cache handle with its liveness state; shared with the gallery gate.
    pub cache: CacheHandle,
    /// Cache-aside gate in front of the media host.
    pub gallery: Arc<CacheAside>,
}

impl AppContext {
    pub fn new(config: Config, cache: CacheHandle, fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        let gallery = Arc::new(CacheAside::new(cache.clone(), fetcher));
        Self {
            config: Arc::new(config),
            cache,
            gallery,
        }
    }
}
