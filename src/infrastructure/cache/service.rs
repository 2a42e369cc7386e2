//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// A cached resolution for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedUrl {
    /// The key resolves to this URL.
    Present(String),
    /// The key is known not to resolve (negative marker).
    Absent,
}

/// Trait for caching key resolutions in front of the repository.
///
/// Implementations must be thread-safe. Callers treat every error as a miss
/// (reads) or a skipped write, so an implementation may fail without
/// affecting correctness, only latency.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - shared Redis cache
/// - [`crate::infrastructure::cache::MemoryCache`] - process-local moka cache
/// - [`crate::infrastructure::cache::NullCache`] - disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached resolution for `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(CachedUrl::Present(url)))` on a positive hit
    /// - `Ok(Some(CachedUrl::Absent))` on a negative hit
    /// - `Ok(None)` on a miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be reached.
    async fn get_url(&self, key: &str) -> CacheResult<Option<CachedUrl>>;

    /// Stores a resolution for `key`, replacing any previous entry.
    ///
    /// Every entry expires after `ttl`; nothing is cached indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be reached.
    async fn set_url(&self, key: &str, value: &CachedUrl, ttl: Duration) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;

    /// Short name of the backend, reported by the health endpoint.
    fn backend_name(&self) -> &'static str;
}
