use async_trait::async_trait;

use crate::domain::TranscriptId;

/// Provider-reported state of a transcript, as seen by one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// Any non-terminal provider status; carries the raw status string.
    InProgress(String),
    Completed(String),
    Failed(String),
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Upload raw audio bytes to the provider's intermediate storage,
    /// returning a URL the job-creation endpoint accepts.
    async fn upload(&self, data: Vec<u8>) -> Result<String, ProviderError>;

    /// Create a transcription job for a directly-reachable audio URL.
    async fn submit(&self, audio_url: &str) -> Result<TranscriptId, ProviderError>;

    /// One status check against an existing transcript.
    async fn poll(&self, id: &TranscriptId) -> Result<PollStatus, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("submission failed (status {status}): {body}")]
    SubmissionFailed { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}
