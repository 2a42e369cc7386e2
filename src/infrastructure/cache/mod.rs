//! Caching layer for key resolutions.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - shared Redis-backed cache
//! - [`MemoryCache`] - process-local moka cache
//! - [`NullCache`] - no-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService, CachedUrl};

#[cfg(test)]
pub use service::MockCacheService;
