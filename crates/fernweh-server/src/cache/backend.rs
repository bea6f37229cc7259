//! Key-value cache backend.
//!
//! The cache is optional infrastructure: `get` reports a miss rather
//! than an error when the backend is down, and `set`/`invalidate` log
//! failures and move on. Entries carry no TTL; they live until the next
//! explicit invalidation.

use std::sync::Arc;

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;

/// Selected at startup from `cache.mode`.
#[derive(Clone)]
pub enum CacheBackend {
    /// No cache at all; every read is a miss.
    Disabled,
    /// Single-instance in-process map.
    Local(Arc<DashMap<String, Vec<u8>>>),
    /// Shared Redis instance.
    Redis(Pool),
}

impl CacheBackend {
    #[must_use]
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    #[must_use]
    pub fn new_redis(pool: Pool) -> Self {
        CacheBackend::Redis(pool)
    }

    /// Looks up a key. Backend failures count as misses.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self {
            CacheBackend::Disabled => None,
            CacheBackend::Local(map) => map.get(key).map(|entry| entry.clone()),
            CacheBackend::Redis(pool) => match pool.get().await {
                Ok(mut conn) => match conn.get::<_, Option<Vec<u8>>>(key).await {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "redis GET failed");
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "redis connection unavailable");
                    None
                }
            },
        }
    }

    /// Stores a value, best effort.
    pub async fn set(&self, key: &str, value: Vec<u8>) {
        match self {
            CacheBackend::Disabled => {}
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), value);
            }
            CacheBackend::Redis(pool) => match pool.get().await {
                Ok(mut conn) => {
                    if let Err(e) = conn.set::<_, _, ()>(key, value).await {
                        tracing::warn!(key = %key, error = %e, "redis SET failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "redis connection unavailable");
                }
            },
        }
    }

    /// Removes a key, best effort. Removing an absent key is a no-op.
    pub async fn invalidate(&self, key: &str) {
        match self {
            CacheBackend::Disabled => {}
            CacheBackend::Local(map) => {
                map.remove(key);
            }
            CacheBackend::Redis(pool) => match pool.get().await {
                Ok(mut conn) => {
                    if let Err(e) = conn.del::<_, ()>(key).await {
                        tracing::warn!(key = %key, error = %e, "redis DEL failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "redis connection unavailable");
                }
            },
        }
    }
}
