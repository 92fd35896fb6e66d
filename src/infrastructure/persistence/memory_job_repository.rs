use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, RecordId};

/// In-process job repository guarding the forward-only status invariant.
pub struct MemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job already exists: {}",
                job.id
            )));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if job.status != status && !job.status.can_transition_to(status) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "illegal transition {} -> {}",
                job.status, status
            )));
        }

        job.status = status;
        job.error_message = error_message.map(String::from);
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn set_transcript_id(
        &self,
        id: JobId,
        transcript_id: &str,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        job.transcript_id = Some(transcript_id.to_string());
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn set_result(
        &self,
        id: JobId,
        record_id: Option<RecordId>,
        post_processed: bool,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        job.record_id = record_id;
        job.post_processed = post_processed;
        job.updated_at = Utc::now();
        Ok(())
    }
}
