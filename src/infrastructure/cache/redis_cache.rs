//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, CachedUrl};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stored value for [`CachedUrl::Absent`].
///
/// A valid URL always starts with a scheme, which cannot begin with `!`, so
/// the marker never collides with a cached URL.
const ABSENT_MARKER: &str = "!absent";

/// Redis cache shared by every service instance.
///
/// Uses `ConnectionManager` for automatic reconnection. Errors are logged and
/// returned; the caller decides to treat them as misses.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - namespace prepended to every key (e.g., `"url:"`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

fn encode_value(value: &CachedUrl) -> &str {
    match value {
        CachedUrl::Present(url) => url,
        CachedUrl::Absent => ABSENT_MARKER,
    }
}

fn decode_value(raw: String) -> CachedUrl {
    if raw == ABSENT_MARKER {
        CachedUrl::Absent
    } else {
        CachedUrl::Present(raw)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, key: &str) -> CacheResult<Option<CachedUrl>> {
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(self.build_key(key)).await {
            Ok(Some(raw)) => {
                debug!("Cache HIT: {}", key);
                Ok(Some(decode_value(raw)))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("Redis GET error for {}: {}", key, e);
                Err(CacheError::OperationError(e.to_string()))
            }
        }
    }

    async fn set_url(&self, key: &str, value: &CachedUrl, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.client.clone();
        // SET EX rejects 0; sub-second TTLs round up.
        let ttl_seconds = ttl.as_secs().max(1);

        match conn
            .set_ex::<_, _, ()>(self.build_key(key), encode_value(value), ttl_seconds)
            .await
        {
            Ok(()) => {
                debug!("Cache SET: {} (TTL: {}s)", key, ttl_seconds);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                Err(CacheError::OperationError(e.to_string()))
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
