//! Redis-backed cache store.
//!
//! Uses a [`ConnectionManager`] for automatic reconnection. The manager is
//! created lazily on first use so a Redis server that is down at startup
//! can still be picked up later by the liveness probe.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use tokio::sync::Mutex;

use sg_core::Error;

use crate::store::CacheStore;

pub struct RedisStore {
    client: redis::Client,
    url: String,
    op_timeout: Duration,
    conn: Mutex<Option<ConnectionManager>>,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("url", &self.url)
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Parse `url` and prepare a client. No connection is made yet.
    pub fn open(url: &str, op_timeout: Duration) -> sg_core::Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::cache(format!("invalid redis url {url}: {e}")))?;
        Ok(Self {
            client,
            url: url.to_string(),
            op_timeout,
            conn: Mutex::new(None),
        })
    }

    async fn connection(&self) -> sg_core::Result<ConnectionManager> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        tracing::debug!("Connecting to redis at {}", self.url);
        let manager = tokio::time::timeout(
            self.op_timeout,
            ConnectionManager::new(self.client.clone()),
        )
        .await
        .map_err(|_| Error::cache(format!("timed out connecting to {}", self.url)))?
        .map_err(|e| Error::cache(format!("failed to connect to {}: {e}", self.url)))?;

        *guard = Some(manager.clone());
        Ok(manager)
    }

    async fn run<T, F, Fut>(&self, op: &str, f: F) -> sg_core::Result<T>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let conn = self.connection().await?;
        match tokio::time::timeout(self.op_timeout, f(conn)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::cache(format!("redis {op} failed: {e}"))),
            Err(_) => Err(Error::cache(format!("redis {op} timed out"))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> sg_core::Result<Option<String>> {
        self.run("GET", |mut conn| async move {
            conn.get::<_, Option<String>>(key).await
        })
        .await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> sg_core::Result<()> {
        let seconds = ttl.as_secs().max(1);
        self.run("SETEX", |mut conn| async move {
            conn.set_ex::<_, _, ()>(key, value, seconds).await
        })
        .await
    }

    async fn delete(&self, key: &str) -> sg_core::Result<bool> {
        let removed: i64 = self
            .run("DEL", |mut conn| async move { conn.del::<_, i64>(key).await })
            .await?;
        Ok(removed > 0)
    }

    async fn ping(&self) -> sg_core::Result<()> {
        let reply: String = self
            .run("PING", |mut conn| async move {
                redis::cmd("PING").query_async::<_, String>(&mut conn).await
            })
            .await?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(Error::cache(format!("unexpected PING reply: {reply}")))
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
