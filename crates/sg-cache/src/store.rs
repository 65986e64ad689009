//! The cache store seam.

use std::time::Duration;

use async_trait::async_trait;

/// An async string key/value store with expiring writes.
///
/// Errors are reported as [`sg_core::Error::Cache`]; callers decide whether
/// a failure degrades or propagates.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value. Expired or missing keys read as `None`.
    async fn get(&self, key: &str) -> sg_core::Result<Option<String>>;

    /// Write a value that expires after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> sg_core::Result<()>;

    /// Remove a key. Returns whether a value was present.
    async fn delete(&self, key: &str) -> sg_core::Result<bool>;

    /// Round-trip to the store to check it is reachable.
    async fn ping(&self) -> sg_core::Result<()>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}
