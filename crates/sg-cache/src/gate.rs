//! Cache-aside gate for the gallery snapshot.
//!
//! Three-way branch on every read:
//!
//! 1. cache unavailable: fetch upstream, return uncached
//! 2. cache hit: decode and return, upstream untouched
//! 3. cache miss: fetch upstream, store with TTL, return uncached
//!
//! Cache failures never fail a read. They are logged, mark the handle
//! disconnected, and the read degrades to an upstream fetch.

use std::sync::Arc;
use std::time::Duration;

use sg_core::{Error, GallerySnapshot, SnapshotFetcher};

use crate::handle::CacheHandle;

pub struct CacheAside {
    cache: CacheHandle,
    fetcher: Arc<dyn SnapshotFetcher>,
}

impl CacheAside {
    pub fn new(cache: CacheHandle, fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    /// Return the snapshot under `key`, fetching and storing it on a miss.
    ///
    /// The boolean is `true` only when the snapshot came from the cache.
    /// Errors are upstream errors; the cache itself never fails this call.
    pub async fn get_or_fetch(
        &self,
        key: &str,
        ttl: Duration,
    ) -> sg_core::Result<(GallerySnapshot, bool)> {
        if !self.cache.is_available() {
            tracing::debug!(key, "Cache unavailable; fetching upstream");
            let snapshot = self.fetcher.fetch_snapshot().await?;
            return Ok((snapshot, false));
        }

        if let Some(snapshot) = self.read(key).await {
            tracing::debug!(key, count = snapshot.len(), "Cache hit");
            return Ok((snapshot, true));
        }

        tracing::debug!(key, "Cache miss; fetching upstream");
        let snapshot = self.fetcher.fetch_snapshot().await?;
        self.write(key, &snapshot, ttl).await;
        Ok((snapshot, false))
    }

    /// Remove the entry under `key`.
    ///
    /// Fails with [`Error::CacheUnavailable`] when the store is down or the
    /// delete itself fails.
    pub async fn clear(&self, key: &str) -> sg_core::Result<()> {
        let Some(store) = self.cache.available_store() else {
            return Err(Error::CacheUnavailable);
        };

        match store.delete(key).await {
            Ok(existed) => {
                tracing::info!(key, existed, "Cache cleared");
                Ok(())
            }
            Err(e) => {
                self.cache.mark_down(&e.to_string());
                Err(Error::CacheUnavailable)
            }
        }
    }

    async fn read(&self, key: &str) -> Option<GallerySnapshot> {
        let store = self.cache.available_store()?;
        let raw = match store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, "Cache read failed: {e}");
                self.cache.mark_down(&e.to_string());
                return None;
            }
        };

        match GallerySnapshot::from_json(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(key, "Discarding undecodable cached value: {e}");
                None
            }
        }
    }

    async fn write(&self, key: &str, snapshot: &GallerySnapshot, ttl: Duration) {
        let Some(store) = self.cache.available_store() else {
            return;
        };

        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, "Failed to encode snapshot for cache: {e}");
                return;
            }
        };

        if let Err(e) = store.set_ex(key, &json, ttl).await {
            tracing::warn!(key, "Cache write failed: {e}");
            self.cache.mark_down(&e.to_string());
        }
    }
}
