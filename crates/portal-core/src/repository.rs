use crate::error::StorageError;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Store-assigned identifier, the input of the identifier codec.
    pub id: u64,
    /// The canonical long URL. Unique across all records.
    pub url: String,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last modified, if ever.
    pub modified_at: Option<Timestamp>,
}

/// A read-only view of a repository.
///
/// This trait provides only the lookups from [`Repository`], so the
/// resolve path never needs write access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Looks up a record by its exact canonical URL.
    /// Returns `None` if no record holds this URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>>;

    /// Looks up a record by its identifier.
    /// Returns `None` if the id was never allocated.
    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Allocates a new id and stores `url` under it.
    ///
    /// Returns `Err(StorageError::Conflict)` if a record for `url` already
    /// exists. Ids are never reused, even when the insert fails.
    async fn create(&self, url: &str) -> Result<UrlRecord>;
}
