//! Report cache backends.
//!
//! The cache holds serialized rating reports keyed two ways: by report id
//! and by movie id. Writers invalidate both keys; readers repopulate on
//! miss. The cache is never authoritative.

use async_trait::async_trait;
use moka::sync::Cache;
use redis::AsyncCommands;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Cache key for a report by its own id.
pub fn report_key(report_id: i32) -> String {
    format!("report:{}", report_id)
}

/// Cache key for a report by the movie it covers.
pub fn movie_key(movie_info_id: i32) -> String {
    format!("report:movie:{}", movie_info_id)
}

/// Key-value storage for serialized rating reports.
#[async_trait]
pub trait ReportCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Redis-backed cache. The multiplexed connection is established once at
/// startup and shared across requests; clones share the same connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ReportCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// In-process cache backed by moka, for tests and single-node deployments.
/// TTL-based with LRU eviction.
pub struct MemoryCache {
    inner: Cache<String, Vec<u8>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .time_to_live(Duration::from_secs(300))
                .max_capacity(10_000)
                .build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.inner.get(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.inner.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.invalidate(key);
        Ok(())
    }
}
