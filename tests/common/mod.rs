#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use shortkey::application::services::UrlService;
use shortkey::domain::codec::KeyCodec;
use shortkey::domain::entities::NewUrlRecord;
use shortkey::domain::repositories::{StoreError, UrlRepository};
use shortkey::infrastructure::cache::{CacheService, MemoryCache, NullCache};
use shortkey::infrastructure::persistence::InMemoryUrlRepository;
use shortkey::state::AppState;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const BASE_URL: &str = "https://s.example.com/";
pub const TTL: Duration = Duration::from_secs(300);

/// In-memory repository that counts lookups.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryUrlRepository,
    lookups: AtomicUsize,
}

impl CountingRepository {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlRepository for CountingRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<i64, StoreError> {
        self.inner.create(new_record).await
    }

    async fn update(&self, id: i64, url: &str) -> Result<(), StoreError> {
        self.inner.update(id, url).await
    }

    async fn lookup(&self, id: i64) -> Result<Option<String>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(id).await
    }

    async fn count(&self, is_static: bool) -> Result<i64, StoreError> {
        self.inner.count(is_static).await
    }
}

/// Repository whose every call fails.
pub struct BrokenRepository;

#[async_trait]
impl UrlRepository for BrokenRepository {
    async fn create(&self, _new_record: NewUrlRecord) -> Result<i64, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn update(&self, _id: i64, _url: &str) -> Result<(), StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn lookup(&self, _id: i64) -> Result<Option<String>, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn count(&self, _is_static: bool) -> Result<i64, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }
}

pub fn codec(alphabet: &str) -> Arc<KeyCodec> {
    Arc::new(KeyCodec::new(alphabet).unwrap())
}

pub fn create_service<R: UrlRepository + 'static>(
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    alphabet: &str,
) -> UrlService<R> {
    UrlService::new(repository, cache, codec(alphabet), TTL)
}

pub fn create_state_with(
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
) -> AppState {
    let service = UrlService::new(repository, cache.clone(), codec(LOWERCASE), TTL);
    AppState::new(Arc::new(service), cache, BASE_URL)
}

/// State over a fresh in-memory store and an in-process cache, keys in `a..z`.
pub fn create_test_state() -> AppState {
    create_state_with(
        Arc::new(InMemoryUrlRepository::new()),
        Arc::new(MemoryCache::default()),
    )
}

/// Same as [`create_test_state`] with caching disabled.
pub fn create_uncached_state() -> AppState {
    create_state_with(Arc::new(InMemoryUrlRepository::new()), Arc::new(NullCache::new()))
}
