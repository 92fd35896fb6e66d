use chrono::{DateTime, Utc};

use super::{AudioSource, JobId, JobStatus, RecordId};

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub source: AudioSource,
    pub status: JobStatus,
    /// Provider-assigned transcript id, present once submission succeeded.
    pub transcript_id: Option<String>,
    pub error_message: Option<String>,
    /// Result record created when the job reached a terminal state.
    pub record_id: Option<RecordId>,
    pub parent_document_id: Option<RecordId>,
    pub post_process: bool,
    /// Whether language-model cleanup was applied to the persisted text.
    pub post_processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(source: AudioSource, parent_document_id: Option<RecordId>, post_process: bool) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            source,
            status: JobStatus::Queued,
            transcript_id: None,
            error_message: None,
            record_id: None,
            parent_document_id,
            post_process,
            post_processed: false,
            created_at: now,
            updated_at: now,
        }
    }
}
