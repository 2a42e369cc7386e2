//! Short key allocation and resolution service.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::codec::KeyCodec;
use crate::domain::entities::NewUrlRecord;
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::infrastructure::cache::{CacheService, CachedUrl};
use crate::utils::url_validator::validate_url;

/// Errors surfaced by [`UrlService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The long URL lacks a scheme or a host.
    #[error("{url} is not a valid url")]
    InvalidUrl { url: String },

    /// The requested alias could not be used.
    ///
    /// When the caller asked to create an alias, a generated key was issued
    /// instead and is carried in `alternate_key`. Updates never fall back, so
    /// the field is `None` there.
    #[error("the alias {requested:?} is not available or is not a valid key")]
    StaticAliasUnavailable {
        requested: String,
        alternate_key: Option<String>,
    },

    /// The alias does not exist or the store refused the update.
    #[error("the alias {key:?} does not exist or could not be updated")]
    UpdateConflict { key: String },

    /// The store failed on an operation with no domain-level fallback.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        error!("Store failure: {}", e);
        Self::Unavailable("the url store is temporarily unavailable".to_string())
    }
}

/// Orchestrates the key codec, the repository and the cache.
///
/// The repository is authoritative for every record; the cache is consulted
/// first on reads and written after every successful allocation, update and
/// resolution. Cache failures are logged and never change an outcome.
///
/// The service holds only shared handles and can be cloned into every request.
pub struct UrlService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    codec: Arc<KeyCodec>,
    cache_ttl: Duration,
}

impl<R: UrlRepository + ?Sized> Clone for UrlService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            cache: self.cache.clone(),
            codec: self.codec.clone(),
            cache_ttl: self.cache_ttl,
        }
    }
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new service.
    ///
    /// # Arguments
    ///
    /// - `repository` - durable store of records
    /// - `cache` - resolution cache; pass [`crate::infrastructure::cache::NullCache`] to disable caching
    /// - `codec` - identifier/key conversion
    /// - `cache_ttl` - lifetime of every cache entry written by the service
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        codec: Arc<KeyCodec>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            codec,
            cache_ttl,
        }
    }

    /// The codec used to derive keys.
    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    /// Shortens `url` under a freshly allocated key.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] before touching the store if the
    /// URL is invalid, and [`ServiceError::Unavailable`] if the store fails.
    pub async fn add_url(&self, url: &str) -> Result<String, ServiceError> {
        Self::check_url(url)?;

        let id = self.repository.create(NewUrlRecord::generated(url)).await?;
        let key = self.encode(id)?;
        info!(key = %key, id, "Allocated key");

        self.cache_put(id, CachedUrl::Present(url.to_string()))
            .await;
        Ok(key)
    }

    /// Shortens `url` under the caller-chosen alias `key`.
    ///
    /// If the alias is not a valid key, or the store rejects it (already taken
    /// or any other store failure), the URL is shortened under a generated key
    /// instead and the call fails with [`ServiceError::StaticAliasUnavailable`]
    /// carrying that key. Re-submitting an existing alias, even for the same
    /// URL, is rejected the same way.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidUrl`] if the URL is invalid (nothing is stored)
    /// - [`ServiceError::StaticAliasUnavailable`] as described above
    /// - [`ServiceError::Unavailable`] if the fallback allocation also fails
    pub async fn add_static_url(&self, url: &str, key: &str) -> Result<String, ServiceError> {
        Self::check_url(url)?;

        let Some(id) = self.key_to_id(key) else {
            warn!(key = %key, "Rejected static alias: not a valid key");
            return Err(self.fallback(url, key).await?);
        };

        match self.repository.create(NewUrlRecord::pinned(url, id)).await {
            Ok(_) => {
                info!(key = %key, id, "Registered static alias");
                self.cache_put(id, CachedUrl::Present(url.to_string()))
                    .await;
                Ok(key.to_string())
            }
            Err(e) => {
                warn!(key = %key, "Static alias unavailable: {}", e);
                Err(self.fallback(url, key).await?)
            }
        }
    }

    /// Points the existing alias `key` at a new URL.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidUrl`] if the URL is invalid
    /// - [`ServiceError::StaticAliasUnavailable`] (without an alternate key) if
    ///   `key` uses symbols outside the alphabet
    /// - [`ServiceError::UpdateConflict`] if no record exists for the key, the
    ///   key exceeds the identifier range, or the store fails
    pub async fn update_static_url(&self, url: &str, key: &str) -> Result<String, ServiceError> {
        Self::check_url(url)?;

        if !self.codec.is_valid_key(key) {
            return Err(ServiceError::StaticAliasUnavailable {
                requested: key.to_string(),
                alternate_key: None,
            });
        }

        let Ok(id) = self.codec.decode(key) else {
            warn!(key = %key, "Update failed: key exceeds the identifier range");
            return Err(ServiceError::UpdateConflict {
                key: key.to_string(),
            });
        };

        self.repository.update(id, url).await.map_err(|e| {
            warn!(key = %key, "Update failed: {}", e);
            ServiceError::UpdateConflict {
                key: key.to_string(),
            }
        })?;

        info!(key = %key, id, "Updated static alias");
        self.cache_put(id, CachedUrl::Present(url.to_string()))
            .await;
        Ok(key.to_string())
    }

    /// Resolves `key` to its URL.
    ///
    /// Invalid keys resolve to `None` without consulting the cache or the
    /// store. Both positive and negative results from the store are cached,
    /// so repeated lookups of a missing key hit the store once per TTL.
    ///
    /// Cache entries are keyed by the canonical key of the identifier, so
    /// spellings with leading zero symbols share one entry.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] if the store fails on a cache miss.
    pub async fn get_url(&self, key: &str) -> Result<Option<String>, ServiceError> {
        if !self.codec.is_valid_key(key) {
            debug!(key = %key, "Not a valid key");
            return Ok(None);
        }

        let Ok(id) = self.codec.decode(key) else {
            debug!(key = %key, "Key exceeds the identifier range");
            return Ok(None);
        };

        match self.cache_get(id).await {
            Some(CachedUrl::Present(url)) => return Ok(Some(url)),
            Some(CachedUrl::Absent) => return Ok(None),
            None => {}
        }

        match self.repository.lookup(id).await? {
            Some(url) => {
                self.cache_put(id, CachedUrl::Present(url.clone())).await;
                Ok(Some(url))
            }
            None => {
                self.cache_put(id, CachedUrl::Absent).await;
                Ok(None)
            }
        }
    }

    /// Counts generated (`false`) or static (`true`) records.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] if the store fails.
    pub async fn count(&self, is_static: bool) -> Result<i64, ServiceError> {
        Ok(self.repository.count(is_static).await?)
    }

    fn check_url(url: &str) -> Result<(), ServiceError> {
        validate_url(url).map_err(|e| {
            debug!("Rejected url {:?}: {}", url, e);
            ServiceError::InvalidUrl {
                url: url.to_string(),
            }
        })
    }

    /// Identifier for an alias, if the alias is a usable key.
    fn key_to_id(&self, key: &str) -> Option<i64> {
        if !self.codec.is_valid_key(key) {
            return None;
        }
        self.codec.decode(key).ok()
    }

    fn encode(&self, id: i64) -> Result<String, ServiceError> {
        self.codec.encode(id).map_err(|e| {
            error!(id, "Store returned an identifier without a key: {}", e);
            ServiceError::Unavailable("the url store returned an invalid identifier".to_string())
        })
    }

    /// Allocates a generated key for a rejected alias and builds the error
    /// that reports it.
    async fn fallback(&self, url: &str, requested: &str) -> Result<ServiceError, ServiceError> {
        let alternate = self.add_url(url).await?;
        info!(requested = %requested, alternate = %alternate, "Issued generated key instead of alias");

        Ok(ServiceError::StaticAliasUnavailable {
            requested: requested.to_string(),
            alternate_key: Some(alternate),
        })
    }

    async fn cache_get(&self, id: i64) -> Option<CachedUrl> {
        let key = self.codec.encode(id).ok()?;
        match self.cache.get_url(&key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %key, "Cache read failed, falling back to store: {}", e);
                None
            }
        }
    }

    async fn cache_put(&self, id: i64, value: CachedUrl) {
        let Ok(key) = self.codec.encode(id) else {
            return;
        };
        if let Err(e) = self.cache.set_url(&key, &value, self.cache_ttl).await {
            warn!(key = %key, "Cache write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{CacheError, MemoryCache, MockCacheService, NullCache};
    use mockall::predicate::eq;

    const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
    const TTL: Duration = Duration::from_secs(60);

    fn service_with(
        repo: MockUrlRepository,
        cache: Arc<dyn CacheService>,
    ) -> UrlService<MockUrlRepository> {
        UrlService::new(
            Arc::new(repo),
            cache,
            Arc::new(KeyCodec::new(LOWERCASE).unwrap()),
            TTL,
        )
    }

    fn failing_cache() -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));
        cache
            .expect_set_url()
            .returning(|_, _, _| Err(CacheError::ConnectionError("down".to_string())));
        cache
    }

    #[tokio::test]
    async fn test_add_url_encodes_allocated_id() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .withf(|r| r.id.is_none() && r.url == "http://www.debian.org/")
            .times(1)
            .returning(|_| Ok(27));

        let cache = Arc::new(MemoryCache::default());
        let service = service_with(repo, cache.clone());

        let key = service.add_url("http://www.debian.org/").await.unwrap();

        assert_eq!(key, "bb");
        assert_eq!(
            cache.get_url("bb").await.unwrap(),
            Some(CachedUrl::Present("http://www.debian.org/".to_string()))
        );
    }

    #[tokio::test]
    async fn test_add_url_rejects_invalid_url_without_side_effects() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create().never();

        let mut cache = MockCacheService::new();
        cache.expect_set_url().never();
        cache.expect_get_url().never();

        let service = service_with(repo, Arc::new(cache));

        let result = service.add_url("www.debian.org").await;

        assert_eq!(
            result,
            Err(ServiceError::InvalidUrl {
                url: "www.debian.org".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_add_url_store_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .returning(|_| Err(StoreError::Database("connection refused".to_string())));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service.add_url("http://example.com").await;

        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_add_url_survives_cache_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create().returning(|_| Ok(1));

        let service = service_with(repo, Arc::new(failing_cache()));

        assert_eq!(service.add_url("http://example.com").await.unwrap(), "b");
    }

    #[tokio::test]
    async fn test_add_static_url_pins_decoded_id() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .with(eq(NewUrlRecord::pinned("http://www.debian.org/", 37_495_029)))
            .times(1)
            .returning(|r| Ok(r.id.unwrap()));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let key = service
            .add_static_url("http://www.debian.org/", "debian")
            .await
            .unwrap();

        assert_eq!(key, "debian");
    }

    #[tokio::test]
    async fn test_add_static_url_conflict_falls_back() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .withf(|r| r.id.is_some())
            .times(1)
            .returning(|r| Err(StoreError::Conflict(r.id.unwrap())));
        repo.expect_create()
            .withf(|r| r.id.is_none())
            .times(1)
            .returning(|_| Ok(2));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service.add_static_url("http://b.example", "debian").await;

        assert_eq!(
            result,
            Err(ServiceError::StaticAliasUnavailable {
                requested: "debian".to_string(),
                alternate_key: Some("c".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_add_static_url_store_error_falls_back() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .withf(|r| r.id.is_some())
            .returning(|_| Err(StoreError::Database("timeout".to_string())));
        repo.expect_create()
            .withf(|r| r.id.is_none())
            .returning(|_| Ok(3));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service.add_static_url("http://b.example", "debian").await;

        assert!(matches!(
            result,
            Err(ServiceError::StaticAliasUnavailable { alternate_key: Some(ref k), .. }) if k == "d"
        ));
    }

    #[tokio::test]
    async fn test_add_static_url_invalid_key_falls_back() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .withf(|r| r.id.is_none())
            .times(1)
            .returning(|_| Ok(1));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service
            .add_static_url("http://www.debian.org/", "Debian!")
            .await;

        assert_eq!(
            result,
            Err(ServiceError::StaticAliasUnavailable {
                requested: "Debian!".to_string(),
                alternate_key: Some("b".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_add_static_url_overflowing_key_falls_back() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .withf(|r| r.id.is_none())
            .times(1)
            .returning(|_| Ok(1));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service
            .add_static_url("http://example.com", &"z".repeat(30))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::StaticAliasUnavailable { alternate_key: Some(_), .. })
        ));
    }

    #[tokio::test]
    async fn test_add_static_url_invalid_url_checked_first() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create().never();

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service.add_static_url("not a url", "Debian!").await;

        assert!(matches!(result, Err(ServiceError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_add_static_url_fallback_failure_is_unavailable() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .returning(|_| Err(StoreError::Database("down".to_string())));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service.add_static_url("http://example.com", "debian").await;

        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_update_static_url_refreshes_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update()
            .withf(|id, url| *id == 37_495_029 && url == "http://new.example")
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_lookup().never();

        let cache = Arc::new(MemoryCache::default());
        cache
            .set_url(
                "debian",
                &CachedUrl::Present("http://old.example".to_string()),
                TTL,
            )
            .await
            .unwrap();
        let service = service_with(repo, cache);

        let key = service
            .update_static_url("http://new.example", "debian")
            .await
            .unwrap();

        assert_eq!(key, "debian");
        assert_eq!(
            service.get_url("debian").await.unwrap().as_deref(),
            Some("http://new.example")
        );
    }

    #[tokio::test]
    async fn test_update_static_url_missing_record() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update()
            .returning(|id, _| Err(StoreError::NotFound(id)));

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service
            .update_static_url("http://example.org/w", "nosuchalias")
            .await;

        assert_eq!(
            result,
            Err(ServiceError::UpdateConflict {
                key: "nosuchalias".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_update_static_url_invalid_key_has_no_fallback() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update().never();
        repo.expect_create().never();

        let service = service_with(repo, Arc::new(NullCache::new()));

        let result = service
            .update_static_url("http://example.org", "no-such")
            .await;

        assert_eq!(
            result,
            Err(ServiceError::StaticAliasUnavailable {
                requested: "no-such".to_string(),
                alternate_key: None,
            })
        );
    }

    #[tokio::test]
    async fn test_update_static_url_overflowing_key_is_update_conflict() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update().never();

        let service = service_with(repo, Arc::new(NullCache::new()));
        let key = "z".repeat(30);

        let result = service.update_static_url("http://example.org", &key).await;

        assert_eq!(result, Err(ServiceError::UpdateConflict { key }));
    }

    #[tokio::test]
    async fn test_update_static_url_caches_canonical_key() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update()
            .withf(|id, _| *id == 1)
            .returning(|_, _| Ok(()));

        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .withf(|key, value, _| {
                key == "b" && *value == CachedUrl::Present("http://new.example".to_string())
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service_with(repo, Arc::new(cache));

        let key = service
            .update_static_url("http://new.example", "aab")
            .await
            .unwrap();

        assert_eq!(key, "aab");
    }

    #[tokio::test]
    async fn test_get_url_leading_zero_spelling_shares_cache_entry() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup().never();

        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .with(eq("b"))
            .times(2)
            .returning(|_| Ok(Some(CachedUrl::Present("http://one.example".to_string()))));

        let service = service_with(repo, Arc::new(cache));

        for key in ["b", "aab"] {
            assert_eq!(
                service.get_url(key).await.unwrap().as_deref(),
                Some("http://one.example")
            );
        }
    }

    #[tokio::test]
    async fn test_get_url_invalid_key_skips_cache_and_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup().never();

        let mut cache = MockCacheService::new();
        cache.expect_get_url().never();
        cache.expect_set_url().never();

        let service = service_with(repo, Arc::new(cache));

        assert_eq!(service.get_url("Not-A-Key").await.unwrap(), None);
        assert_eq!(service.get_url("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_url_cache_hit_skips_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup().never();

        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .with(eq("debian"))
            .returning(|_| Ok(Some(CachedUrl::Present("http://www.debian.org/".to_string()))));

        let service = service_with(repo, Arc::new(cache));

        assert_eq!(
            service.get_url("debian").await.unwrap().as_deref(),
            Some("http://www.debian.org/")
        );
    }

    #[tokio::test]
    async fn test_get_url_negative_marker_skips_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup().never();

        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .returning(|_| Ok(Some(CachedUrl::Absent)));

        let service = service_with(repo, Arc::new(cache));

        assert_eq!(service.get_url("debian").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_url_caches_missing_key_once() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup()
            .withf(|id| *id == 37_495_029)
            .times(1)
            .returning(|_| Ok(None));

        let service = service_with(repo, Arc::new(MemoryCache::default()));

        assert_eq!(service.get_url("debian").await.unwrap(), None);
        assert_eq!(service.get_url("debian").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_url_caches_hit() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup()
            .times(1)
            .returning(|_| Ok(Some("http://www.debian.org/".to_string())));

        let service = service_with(repo, Arc::new(MemoryCache::default()));

        for _ in 0..3 {
            assert_eq!(
                service.get_url("debian").await.unwrap().as_deref(),
                Some("http://www.debian.org/")
            );
        }
    }

    #[tokio::test]
    async fn test_get_url_overflowing_key_is_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup().never();

        let service = service_with(repo, Arc::new(NullCache::new()));

        assert_eq!(service.get_url(&"z".repeat(30)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_url_survives_cache_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup()
            .times(2)
            .returning(|_| Ok(Some("http://www.debian.org/".to_string())));

        let service = service_with(repo, Arc::new(failing_cache()));

        for _ in 0..2 {
            assert_eq!(
                service.get_url("debian").await.unwrap().as_deref(),
                Some("http://www.debian.org/")
            );
        }
    }

    #[tokio::test]
    async fn test_get_url_store_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_lookup()
            .returning(|_| Err(StoreError::Database("down".to_string())));

        let service = service_with(repo, Arc::new(NullCache::new()));

        assert!(matches!(
            service.get_url("debian").await,
            Err(ServiceError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_count_passthrough() {
        let mut repo = MockUrlRepository::new();
        repo.expect_count().with(eq(false)).returning(|_| Ok(12));
        repo.expect_count().with(eq(true)).returning(|_| Ok(3));

        let service = service_with(repo, Arc::new(NullCache::new()));

        assert_eq!(service.count(false).await.unwrap(), 12);
        assert_eq!(service.count(true).await.unwrap(), 3);
    }
}
