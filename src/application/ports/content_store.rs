use async_trait::async_trait;

use crate::domain::{RecordId, RecordStatus};

/// Monotonic revision of a stored record's body, used for optimistic
/// concurrency on parent-document appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordRevision(pub u64);

#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: RecordId,
    pub title: String,
    pub body: String,
    pub status: RecordStatus,
    pub revision: RecordRevision,
}

/// Boundary to the external content platform. Creation failures are not
/// retried by callers; appends use read-revision / write-if-unchanged.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create(
        &self,
        title: &str,
        body: &str,
        status: RecordStatus,
    ) -> Result<RecordId, ContentStoreError>;

    async fn get(&self, id: RecordId) -> Result<StoredRecord, ContentStoreError>;

    /// Replace the record body only if its revision still matches
    /// `expected`; returns the new revision, or `Conflict` for the caller to
    /// re-read and retry.
    async fn update_if_unchanged(
        &self,
        id: RecordId,
        expected: RecordRevision,
        body: &str,
    ) -> Result<RecordRevision, ContentStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("revision conflict")]
    Conflict,
    #[error("store operation failed: {0}")]
    StoreFailed(String),
}
