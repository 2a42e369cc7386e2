//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService, CachedUrl};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every read is a miss and every write succeeds without storing anything,
/// so all resolutions go to the repository.
///
/// # Use Cases
///
/// - `CACHE_BACKEND=none`
/// - Fallback when Redis is unreachable at startup
/// - Tests that must observe every repository call
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_url(&self, _key: &str) -> CacheResult<Option<CachedUrl>> {
        Ok(None)
    }

    async fn set_url(&self, _key: &str, _value: &CachedUrl, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
