//! In-process cache store.
//!
//! Entries carry their own expiry instant; expired entries read as absent
//! and are dropped on access. The store can be switched offline to stand in
//! for an unreachable server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use sg_core::Error;

use crate::store::CacheStore;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    online: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
        }
    }

    /// Toggle reachability. While offline every operation fails.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Number of unexpired entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> sg_core::Result<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(Error::cache("memory store offline"))
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> sg_core::Result<Option<String>> {
        self.check_online()?;
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> sg_core::Result<()> {
        self.check_online()?;
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> sg_core::Result<bool> {
        self.check_online()?;
        let removed = self.entries.lock().remove(key);
        Ok(removed.is_some_and(|e| e.expires_at > Instant::now()))
    }

    async fn ping(&self) -> sg_core::Result<()> {
        self.check_online()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
