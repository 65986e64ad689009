//! Cache handle with its own liveness state.
//!
//! [`CacheHandle`] is passed through the application context instead of a
//! process-wide "connected" flag. A handle either has no store at all
//! (cache disabled) or a store plus an atomic liveness flag. Store errors
//! flip the flag down; the background probe flips it back up once the
//! store answers again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use sg_core::config::{CacheBackend, CacheConfig};

use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;
use crate::store::CacheStore;

/// Reported cache state, as exposed by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Connected,
    Disconnected,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Connected => "connected",
            CacheStatus::Disconnected => "disconnected",
        }
    }
}

struct HandleInner {
    store: Option<Arc<dyn CacheStore>>,
    live: AtomicBool,
}

/// Shared handle to the cache store. Cheap to clone.
#[derive(Clone)]
pub struct CacheHandle {
    inner: Arc<HandleInner>,
}

impl std::fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHandle")
            .field("store", &self.inner.store.as_ref().map(|s| s.name()))
            .field("status", &self.status())
            .finish()
    }
}

impl CacheHandle {
    /// A handle with no store. Always unavailable.
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(HandleInner {
                store: None,
                live: AtomicBool::new(false),
            }),
        }
    }

    /// Wrap a store without contacting it. Starts disconnected.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                store: Some(store),
                live: AtomicBool::new(false),
            }),
        }
    }

    /// Wrap a store and ping it once to establish the initial state.
    pub async fn connect(store: Arc<dyn CacheStore>) -> Self {
        let handle = Self::new(store);
        handle.probe().await;
        handle
    }

    /// Build the handle described by `config` and probe it once.
    ///
    /// An unusable Redis URL yields a disabled handle rather than an error so
    /// the gallery keeps serving uncached.
    pub async fn from_config(config: &CacheConfig) -> Self {
        let store: Arc<dyn CacheStore> = match config.backend {
            CacheBackend::None => {
                tracing::info!("Cache disabled by configuration");
                return Self::disabled();
            }
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
            CacheBackend::Redis => {
                let timeout = Duration::from_millis(config.op_timeout_ms.max(1));
                match RedisStore::open(&config.url, timeout) {
                    Ok(store) => Arc::new(store),
                    Err(e) => {
                        tracing::error!("Cache disabled: {e}");
                        return Self::disabled();
                    }
                }
            }
        };

        let handle = Self::connect(store).await;
        if !handle.is_available() {
            tracing::warn!("Cache store not reachable at startup; serving uncached until it is");
        }
        handle
    }

    /// Whether a store is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.inner.store.is_some()
    }

    /// Whether the store is configured and currently believed reachable.
    pub fn is_available(&self) -> bool {
        self.inner.store.is_some() && self.inner.live.load(Ordering::Acquire)
    }

    pub fn status(&self) -> CacheStatus {
        if self.is_available() {
            CacheStatus::Connected
        } else {
            CacheStatus::Disconnected
        }
    }

    /// The store, if it is currently available.
    pub fn available_store(&self) -> Option<&Arc<dyn CacheStore>> {
        if self.is_available() {
            self.inner.store.as_ref()
        } else {
            None
        }
    }

    pub fn mark_down(&self, reason: &str) {
        if self.inner.store.is_some() && self.inner.live.swap(false, Ordering::AcqRel) {
            tracing::warn!("Cache disconnected: {reason}");
        }
    }

    pub fn mark_up(&self) {
        if let Some(store) = &self.inner.store {
            if !self.inner.live.swap(true, Ordering::AcqRel) {
                tracing::info!("Cache connected ({})", store.name());
            }
        }
    }

    /// Ping the store and update liveness. Returns the new availability.
    pub async fn probe(&self) -> bool {
        let Some(store) = &self.inner.store else {
            return false;
        };
        match store.ping().await {
            Ok(()) => {
                self.mark_up();
                true
            }
            Err(e) => {
                self.mark_down(&e.to_string());
                false
            }
        }
    }

    /// Spawn a task that re-probes the store every `interval` until
    /// `cancel` fires. Returns `None` when there is nothing to probe.
    pub fn spawn_probe(
        &self,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Option<JoinHandle<()>> {
        if self.inner.store.is_none() || interval.is_zero() {
            return None;
        }

        let handle = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; startup already probed.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        handle.probe().await;
                    }
                }
            }
            tracing::debug!("Cache probe stopped");
        }))
    }
}
