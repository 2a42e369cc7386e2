//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

/// Service handle with the repository chosen at startup.
pub type DynUrlService = UrlService<dyn UrlRepository>;

#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<DynUrlService>,
    pub cache: Arc<dyn CacheService>,
    /// Public prefix of short links, e.g. `https://s.example.com/`.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        url_service: Arc<DynUrlService>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            url_service,
            cache,
            base_url,
        }
    }

    /// Full short link for `key`.
    pub fn short_url(&self, key: &str) -> String {
        format!("{}{}", self.base_url, key)
    }
}
