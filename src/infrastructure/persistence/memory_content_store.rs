use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{ContentStore, ContentStoreError, RecordRevision, StoredRecord};
use crate::domain::{RecordId, RecordStatus};

/// In-process content store. The real content platform sits outside this
/// service; this adapter is the local stand-in and the test double, and it
/// enforces the same revision CAS the platform boundary promises.
pub struct MemoryContentStore {
    records: RwLock<HashMap<RecordId, StoredRecord>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a record, e.g. a parent document for appends. Test helper and
    /// local bootstrap.
    pub async fn insert(&self, title: &str, body: &str, status: RecordStatus) -> RecordId {
        let id = RecordId::new();
        let record = StoredRecord {
            id,
            title: title.to_string(),
            body: body.to_string(),
            status,
            revision: RecordRevision(0),
        };
        self.records.write().await.insert(id, record);
        id
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn create(
        &self,
        title: &str,
        body: &str,
        status: RecordStatus,
    ) -> Result<RecordId, ContentStoreError> {
        Ok(self.insert(title, body, status).await)
    }

    async fn get(&self, id: RecordId) -> Result<StoredRecord, ContentStoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ContentStoreError::NotFound(id.to_string()))
    }

    async fn update_if_unchanged(
        &self,
        id: RecordId,
        expected: RecordRevision,
        body: &str,
    ) -> Result<RecordRevision, ContentStoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| ContentStoreError::NotFound(id.to_string()))?;

        if record.revision != expected {
            return Err(ContentStoreError::Conflict);
        }

        record.body = body.to_string();
        record.revision = RecordRevision(record.revision.0 + 1);
        Ok(record.revision)
    }
}
