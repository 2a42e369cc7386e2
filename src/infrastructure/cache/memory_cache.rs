//! In-process cache implementation on moka.

use super::service::{CacheResult, CacheService, CachedUrl};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default maximum number of cached keys.
pub const DEFAULT_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    value: CachedUrl,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Process-local cache with a bounded capacity.
///
/// Suitable for single-instance deployments; each process has its own view,
/// so invalidation across instances relies on TTL expiry alone.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Entry>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_capacity` keys.
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, key: &str) -> CacheResult<Option<CachedUrl>> {
        match self.cache.get(key).await {
            Some(entry) => {
                debug!("Cache HIT: {}", key);
                Ok(Some(entry.value))
            }
            None => {
                trace!("Cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    async fn set_url(&self, key: &str, value: &CachedUrl, ttl: Duration) -> CacheResult<()> {
        self.cache
            .insert(
                key.to_string(),
                Entry {
                    value: value.clone(),
                    ttl,
                },
            )
            .await;
        debug!("Cache SET: {} (TTL: {:?})", key, ttl);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
