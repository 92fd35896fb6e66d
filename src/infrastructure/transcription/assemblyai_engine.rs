use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{PollStatus, ProviderError, TranscriptionProvider};
use crate::domain::TranscriptId;

// Audio files and provider-side processing can both be large and slow, so
// the per-call budget is deliberately generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct AssemblyAiEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    audio_url: &'a str,
    speaker_labels: bool,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Deserialize)]
struct TranscriptResponse {
    status: String,
    text: Option<String>,
    error: Option<String>,
}

impl AssemblyAiEngine {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.assemblyai.com/v2".to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for AssemblyAiEngine {
    async fn upload(&self, data: Vec<u8>) -> Result<String, ProviderError> {
        let url = format!("{}/upload", self.base_url);

        tracing::debug!(bytes = data.len(), "Uploading audio to AssemblyAI");

        let response = self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .body(data)
            .send()
            .await
            .map_err(|e| ProviderError::UploadFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::UploadFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let result: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("upload response: {}", e)))?;

        Ok(result.upload_url)
    }

    async fn submit(&self, audio_url: &str) -> Result<TranscriptId, ProviderError> {
        let url = format!("{}/transcript", self.base_url);
        let request = SubmitRequest {
            audio_url,
            speaker_labels: true,
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::SubmissionFailed { status, body });
        }

        let result: SubmitResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("submit response: {}", e)))?;

        tracing::info!(transcript_id = %result.id, "Transcript created");

        Ok(TranscriptId::new(result.id))
    }

    async fn poll(&self, id: &TranscriptId) -> Result<PollStatus, ProviderError> {
        let url = format!("{}/transcript/{}", self.base_url, id.as_str());

        let response = self
            .client
            .get(&url)
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::Transport(format!(
                "status {}: {}",
                status, body
            )));
        }

        let result: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("poll response: {}", e)))?;

        // Only "completed" and "error"/"failed" are terminal; every other
        // provider status string counts as still processing.
        match result.status.as_str() {
            "completed" => Ok(PollStatus::Completed(result.text.unwrap_or_default())),
            "error" | "failed" => Ok(PollStatus::Failed(
                result
                    .error
                    .unwrap_or_else(|| "provider reported failure without detail".to_string()),
            )),
            other => Ok(PollStatus::InProgress(other.to_string())),
        }
    }
}
