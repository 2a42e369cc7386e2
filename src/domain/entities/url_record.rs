//! URL record entity.

use chrono::{DateTime, Utc};

/// A stored mapping from an identifier to a long URL.
///
/// The short key is not stored: it is derived from `id` with
/// [`crate::domain::codec::KeyCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    /// `true` when the identifier was chosen by the caller as an alias.
    pub is_static: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a record timestamped now.
    pub fn new(id: i64, url: String, is_static: bool) -> Self {
        let now = Utc::now();
        Self {
            id,
            url,
            is_static,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input data for creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub url: String,
    /// `Some` pins the identifier (static alias), `None` lets the store allocate one.
    pub id: Option<i64>,
}

impl NewUrlRecord {
    /// A record whose identifier is allocated by the store.
    pub fn generated(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: None,
        }
    }

    /// A record pinned to `id`.
    pub fn pinned(url: impl Into<String>, id: i64) -> Self {
        Self {
            url: url.into(),
            id: Some(id),
        }
    }

    pub fn is_static(&self) -> bool {
        self.id.is_some()
    }
}
