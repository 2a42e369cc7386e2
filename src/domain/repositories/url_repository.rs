//! Repository trait for URL record storage.

use crate::domain::entities::NewUrlRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`UrlRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A pinned identifier is already taken.
    #[error("identifier {0} is already in use")]
    Conflict(i64),

    /// No record exists for the identifier.
    #[error("identifier {0} does not exist")]
    NotFound(i64),

    /// The backend failed.
    #[error("storage error: {0}")]
    Database(String),
}

/// Durable storage for URL records, and the only arbiter of identifier
/// uniqueness.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a record and returns its identifier.
    ///
    /// With `new_record.id == None` the store allocates a fresh identifier.
    /// With `Some(id)` the insert is an atomic check-and-insert: of any number
    /// of concurrent creates for the same identifier, exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a pinned identifier is taken.
    /// Returns [`StoreError::Database`] on backend errors.
    async fn create(&self, new_record: NewUrlRecord) -> Result<i64, StoreError>;

    /// Replaces the URL of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has identifier `id`.
    /// Returns [`StoreError::Database`] on backend errors.
    async fn update(&self, id: i64, url: &str) -> Result<(), StoreError>;

    /// Returns the URL stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend errors.
    async fn lookup(&self, id: i64) -> Result<Option<String>, StoreError>;

    /// Counts records created through the generated (`false`) or static
    /// (`true`) path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend errors.
    async fn count(&self, is_static: bool) -> Result<i64, StoreError>;
}
