//! Process-local URL repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};

/// In-memory repository on a sharded [`DashMap`].
///
/// Used when no database is configured and by the integration tests. Records
/// live as long as the process.
#[derive(Debug)]
pub struct InMemoryUrlRepository {
    records: DashMap<i64, UrlRecord>,
    next_id: AtomicI64,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Returns a copy of the full record, including metadata.
    pub fn get(&self, id: i64) -> Option<UrlRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }
}

impl Default for InMemoryUrlRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<i64, StoreError> {
        let is_static = new_record.is_static();

        if let Some(id) = new_record.id {
            return match self.records.entry(id) {
                Entry::Occupied(_) => Err(StoreError::Conflict(id)),
                Entry::Vacant(slot) => {
                    slot.insert(UrlRecord::new(id, new_record.url, is_static));
                    Ok(id)
                }
            };
        }

        // Skip identifiers already claimed by static aliases.
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            if id == i64::MAX {
                return Err(StoreError::Database("identifier space exhausted".to_string()));
            }

            if let Entry::Vacant(slot) = self.records.entry(id) {
                slot.insert(UrlRecord::new(id, new_record.url, is_static));
                return Ok(id);
            }
        }
    }

    async fn update(&self, id: i64, url: &str) -> Result<(), StoreError> {
        let mut record = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.url = url.to_string();
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn lookup(&self, id: i64) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(&id).map(|r| r.url.clone()))
    }

    async fn count(&self, is_static: bool) -> Result<i64, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_static == is_static)
            .count() as i64)
    }
}
