use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    AudioPreprocessor, ProviderError, TranscriptEditor, TranscriptionProvider,
};
use crate::application::services::{poll_until_terminal, PollOutcome, PollPolicy};
use crate::domain::{AudioSource, FailureDetail, SuccessPayload, TranscriptId};

/// Per-job sequence: preprocess (local files) -> upload -> submit -> poll to
/// terminal -> optional cleanup. Owns no job state; the runner layers status
/// bookkeeping on top of these stages.
pub struct TranscriptionPipeline {
    preprocessor: Arc<dyn AudioPreprocessor>,
    provider: Arc<dyn TranscriptionProvider>,
    editor: Arc<dyn TranscriptEditor>,
    poll_policy: PollPolicy,
}

impl TranscriptionPipeline {
    pub fn new(
        preprocessor: Arc<dyn AudioPreprocessor>,
        provider: Arc<dyn TranscriptionProvider>,
        editor: Arc<dyn TranscriptEditor>,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            preprocessor,
            provider,
            editor,
            poll_policy,
        }
    }

    /// Resolve the audio source to a provider URL and create the transcript.
    /// Preprocess and submission failures short-circuit the job; neither is
    /// retried.
    pub async fn submit(&self, source: &AudioSource) -> Result<TranscriptId, FailureDetail> {
        let audio_url = match source {
            AudioSource::RemoteUrl(url) => url.clone(),
            AudioSource::LocalFile { path, .. } => self.upload_local(path).await?,
        };

        self.provider
            .submit(&audio_url)
            .await
            .map_err(submission_failure)
    }

    async fn upload_local(&self, path: &Path) -> Result<String, FailureDetail> {
        let prepared = self
            .preprocessor
            .prepare(path)
            .await
            .map_err(|e| FailureDetail::Preprocess(e.to_string()))?;

        let data = tokio::fs::read(&prepared)
            .await
            .map_err(|e| FailureDetail::Submission(format!("cannot read audio file: {}", e)))?;

        tracing::debug!(bytes = data.len(), path = %prepared.display(), "Uploading audio");

        self.provider
            .upload(data)
            .await
            .map_err(submission_failure)
    }

    /// Drive the poll loop until the provider reports a terminal status or
    /// the attempt budget runs out.
    pub async fn await_terminal(&self, id: &TranscriptId) -> Result<String, FailureDetail> {
        let outcome = poll_until_terminal(
            self.provider.as_ref(),
            id,
            self.poll_policy,
            |_status| {},
        )
        .await
        .map_err(|e| FailureDetail::Transport(e.to_string()))?;

        match outcome {
            PollOutcome::Completed(text) => Ok(text),
            PollOutcome::Failed(detail) => Err(FailureDetail::Provider(detail)),
            PollOutcome::TimedOut { attempts } => Err(FailureDetail::Timeout { attempts }),
        }
    }

    /// Best-effort cleanup pass. Any editor failure falls back to the raw
    /// text; post-processing never fails a job.
    pub async fn post_process(&self, raw_text: String, enabled: bool) -> SuccessPayload {
        if !enabled {
            return SuccessPayload {
                text: raw_text,
                post_processed: false,
            };
        }

        match self.editor.clean(&raw_text).await {
            Ok(cleaned) => SuccessPayload {
                text: cleaned,
                post_processed: true,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Post-processing failed, keeping raw transcript");
                SuccessPayload {
                    text: raw_text,
                    post_processed: false,
                }
            }
        }
    }
}

fn submission_failure(e: ProviderError) -> FailureDetail {
    FailureDetail::Submission(e.to_string())
}
