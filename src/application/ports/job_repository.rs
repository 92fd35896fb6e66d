use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Job, JobId, JobStatus, RecordId};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Forward-only status transition; rejects moves out of a terminal
    /// state with `ConstraintViolation`.
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    async fn set_transcript_id(&self, id: JobId, transcript_id: &str)
        -> Result<(), RepositoryError>;

    /// Record the persisted result and whether cleanup was applied.
    async fn set_result(
        &self,
        id: JobId,
        record_id: Option<RecordId>,
        post_processed: bool,
    ) -> Result<(), RepositoryError>;
}
