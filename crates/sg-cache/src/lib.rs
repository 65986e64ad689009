//! sg-cache: the cache-aside read path.
//!
//! - [`CacheStore`]: async key/value store with TTL writes, implemented by
//!   [`RedisStore`] and [`MemoryStore`]
//! - [`CacheHandle`]: cloneable handle carrying a store plus its own
//!   liveness state, with a background probe that restores it
//! - [`CacheAside`]: the gate that serves cached snapshots, falls back to
//!   the fetcher on miss, and supports explicit invalidation

pub mod gate;
pub mod handle;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use gate::CacheAside;
pub use handle::{CacheHandle, CacheStatus};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::CacheStore;
