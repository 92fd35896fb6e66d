use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::application::services::{ResultPersister, TranscriptionPipeline};
use crate::domain::{
    AudioSource, FailureDetail, Job, JobId, JobStatus, PipelineOutcome, RecordId, SuccessPayload,
};

/// Terminal summary of one job, returned to synchronous (client-driven)
/// submissions.
#[derive(Debug, Clone)]
pub struct JobCompletion {
    pub status: JobStatus,
    pub record_id: Option<RecordId>,
    pub text: Option<String>,
    pub error_message: Option<String>,
}

/// Orchestrator boundary for a single job: drives the pipeline, keeps the
/// repository's status transitions forward-only, persists exactly one result
/// record per terminal state, and cleans up spooled audio. Every failure
/// inside the pipeline ends as a persisted failure outcome; jobs are never
/// left dangling in `Processing`.
pub struct JobRunner {
    pipeline: Arc<TranscriptionPipeline>,
    persister: Arc<ResultPersister>,
    job_repository: Arc<dyn JobRepository>,
}

impl JobRunner {
    pub fn new(
        pipeline: Arc<TranscriptionPipeline>,
        persister: Arc<ResultPersister>,
        job_repository: Arc<dyn JobRepository>,
    ) -> Self {
        Self {
            pipeline,
            persister,
            job_repository,
        }
    }

    pub async fn run_job(&self, job: &Job) -> JobCompletion {
        let span = tracing::info_span!(
            "transcription_job",
            job_id = %job.id,
            source = %job.source.describe(),
        );

        async {
            self.mark_status(job.id, JobStatus::Processing, None).await;

            let outcome = self.execute_pipeline(job).await;

            let completion = match outcome {
                Ok(payload) => self.finish_success(job, payload).await,
                Err(failure) => self.finish_failure(job, failure).await,
            };

            self.cleanup_source(&job.source).await;
            completion
        }
        .instrument(span)
        .await
    }

    async fn execute_pipeline(&self, job: &Job) -> PipelineOutcome {
        let transcript_id = self.pipeline.submit(&job.source).await?;

        if let Err(e) = self
            .job_repository
            .set_transcript_id(job.id, transcript_id.as_str())
            .await
        {
            tracing::warn!(error = %e, "Failed to record provider transcript id");
        }

        let raw_text = self.pipeline.await_terminal(&transcript_id).await?;
        Ok(self.pipeline.post_process(raw_text, job.post_process).await)
    }

    async fn finish_success(&self, job: &Job, payload: SuccessPayload) -> JobCompletion {
        match self
            .persister
            .persist_success(job.source.filename(), &payload, job.parent_document_id)
            .await
        {
            Ok(record_id) => {
                self.record_result(job.id, Some(record_id), payload.post_processed)
                    .await;
                self.mark_status(job.id, JobStatus::Completed, None).await;
                tracing::info!(record_id = %record_id, "Transcription completed");
                JobCompletion {
                    status: JobStatus::Completed,
                    record_id: Some(record_id),
                    text: Some(payload.text),
                    error_message: None,
                }
            }
            Err(e) => {
                // Persistence failure is terminal and only generically
                // user-visible; the transcript itself is lost with it.
                tracing::error!(error = %e, "Failed to save transcription result");
                let message = "failed to save transcription result".to_string();
                self.mark_status(job.id, JobStatus::Failed, Some(&message))
                    .await;
                JobCompletion {
                    status: JobStatus::Failed,
                    record_id: None,
                    text: Some(payload.text),
                    error_message: Some(message),
                }
            }
        }
    }

    async fn finish_failure(&self, job: &Job, failure: FailureDetail) -> JobCompletion {
        tracing::warn!(failure = %failure, "Transcription job failed");

        let record_id = match self
            .persister
            .persist_failure(job.source.filename(), &failure, job.parent_document_id)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save failure record");
                None
            }
        };

        if record_id.is_some() {
            self.record_result(job.id, record_id, false).await;
        }
        let message = failure.to_string();
        self.mark_status(job.id, JobStatus::Failed, Some(&message))
            .await;

        JobCompletion {
            status: JobStatus::Failed,
            record_id,
            text: None,
            error_message: Some(message),
        }
    }

    async fn cleanup_source(&self, source: &AudioSource) {
        if let AudioSource::LocalFile {
            path,
            delete_after: true,
            ..
        } = source
        {
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete spooled audio");
            }
        }
    }

    async fn mark_status(&self, id: JobId, status: JobStatus, error_message: Option<&str>) {
        if let Err(e) = self
            .job_repository
            .update_status(id, status, error_message)
            .await
        {
            log_repo_error(id, status, e);
        }
    }

    async fn record_result(&self, id: JobId, record_id: Option<RecordId>, post_processed: bool) {
        if let Err(e) = self
            .job_repository
            .set_result(id, record_id, post_processed)
            .await
        {
            tracing::error!(job_id = %id, error = %e, "Failed to record job result");
        }
    }
}

fn log_repo_error(id: JobId, status: JobStatus, e: RepositoryError) {
    tracing::error!(
        job_id = %id,
        status = %status,
        error = %e,
        "Failed to update job status"
    );
}
