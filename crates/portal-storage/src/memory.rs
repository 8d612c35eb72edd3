use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use portal_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use portal_core::StorageError;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Records are keyed by id, with a second map from url to id acting as the
/// unique index. DashMap's sharded locks let lookups proceed concurrently
/// with inserts into other buckets.
#[derive(Debug)]
pub struct InMemoryRepository {
    records: DashMap<u64, UrlRecord>,
    by_url: DashMap<String, u64>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            by_url: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>> {
        let Some(id) = self.by_url.get(url).map(|entry| *entry) else {
            return Ok(None);
        };

        Ok(self.records.get(&id).map(|record| record.clone()))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>> {
        Ok(self.records.get(&id).map(|record| record.clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create(&self, url: &str) -> Result<UrlRecord> {
        // Holding the index entry keeps the uniqueness check and the insert atomic.
        match self.by_url.entry(url.to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(url.to_owned())),
            Entry::Vacant(slot) => {
                let record = UrlRecord {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    url: url.to_owned(),
                    created_at: Timestamp::now(),
                    modified_at: None,
                };
                self.records.insert(record.id, record.clone());
                slot.insert(record.id);
                Ok(record)
            }
        }
    }
}
