use std::sync::Arc;

use crate::application::ports::{ContentStore, ContentStoreError};
use crate::domain::{
    derive_title, render_section, FailureDetail, RecordId, RecordStatus, SuccessPayload,
};

const DEFAULT_APPEND_RETRIES: u32 = 3;

/// Writes the terminal outcome of a job to the content store: one new record
/// per terminal job, plus a labeled section appended to the parent document
/// when one was designated.
pub struct ResultPersister {
    store: Arc<dyn ContentStore>,
    max_append_retries: u32,
}

impl ResultPersister {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            max_append_retries: DEFAULT_APPEND_RETRIES,
        }
    }

    pub fn with_append_retries(mut self, retries: u32) -> Self {
        self.max_append_retries = retries;
        self
    }

    /// Persist a completed transcript. Successes publish; the structured
    /// outcome collapses into rendered strings only here.
    pub async fn persist_success(
        &self,
        filename: Option<&str>,
        payload: &SuccessPayload,
        parent: Option<RecordId>,
    ) -> Result<RecordId, ContentStoreError> {
        let title = derive_title(filename, &payload.text);
        let record_id = self
            .store
            .create(&title, &payload.text, RecordStatus::Published)
            .await?;

        if let Some(parent_id) = parent {
            let heading = format!("Transcript: {}", title);
            // The record is the primary outcome; losing the parent append
            // must not orphan it.
            if let Err(e) = self
                .append_to_parent(parent_id, &heading, &payload.text)
                .await
            {
                tracing::error!(
                    parent_id = %parent_id,
                    record_id = %record_id,
                    error = %e,
                    "Parent append failed, keeping result record"
                );
            }
        }

        Ok(record_id)
    }

    /// Persist a failed job as a draft record so the user always ends up
    /// with something visible.
    pub async fn persist_failure(
        &self,
        filename: Option<&str>,
        failure: &FailureDetail,
        parent: Option<RecordId>,
    ) -> Result<RecordId, ContentStoreError> {
        let message = failure.to_string();
        let title = derive_title(filename, "");
        let body = format!("Transcription failed: {}", message);
        let record_id = self.store.create(&title, &body, RecordStatus::Draft).await?;

        if let Some(parent_id) = parent {
            let heading = format!("Transcript failed: {}", title);
            if let Err(e) = self.append_to_parent(parent_id, &heading, &message).await {
                tracing::error!(
                    parent_id = %parent_id,
                    record_id = %record_id,
                    error = %e,
                    "Parent append failed, keeping failure record"
                );
            }
        }

        Ok(record_id)
    }

    /// Append-only mutation of the parent body, guarded by read-revision /
    /// write-if-unchanged with a bounded conflict retry. Concurrent jobs
    /// against the same parent are allowed to race; the CAS keeps each
    /// individual append atomic.
    async fn append_to_parent(
        &self,
        parent_id: RecordId,
        heading: &str,
        content: &str,
    ) -> Result<(), ContentStoreError> {
        let section = render_section(heading, content);

        for attempt in 0..=self.max_append_retries {
            let parent = self.store.get(parent_id).await?;
            let new_body = if parent.body.is_empty() {
                section.clone()
            } else {
                format!("{}\n\n{}", parent.body, section)
            };

            match self
                .store
                .update_if_unchanged(parent_id, parent.revision, &new_body)
                .await
            {
                Ok(_) => return Ok(()),
                Err(ContentStoreError::Conflict) if attempt < self.max_append_retries => {
                    tracing::debug!(
                        parent_id = %parent_id,
                        attempt,
                        "Parent revision moved, re-reading before append"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(ContentStoreError::Conflict)
    }
}
