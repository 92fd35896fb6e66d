use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ErrorResponse;
use crate::application::services::TranscriptionMessage;
use crate::domain::{AudioSource, Job, RecordId};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub audio_url: String,
    pub parent_document_id: Option<Uuid>,
    pub post_process: Option<bool>,
    /// `true` runs the job inside this request (client-driven, abandoned if
    /// the client disconnects); `false` enqueues it for the worker.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub message: String,
}

#[tracing::instrument(skip(state, request), fields(audio_url = %request.audio_url))]
pub async fn submit_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    if request.audio_url.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "audio_url must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    let source = AudioSource::RemoteUrl(request.audio_url.clone());
    let job = Job::new(
        source,
        request.parent_document_id.map(RecordId::from_uuid),
        request.post_process.unwrap_or(state.post_process_default),
    );

    dispatch_job(&state, job, request.wait).await
}

/// Shared tail of both submission entry points: record the job, then either
/// hand it to the durable worker or drive it to completion inline.
pub(crate) async fn dispatch_job(state: &AppState, job: Job, wait: bool) -> Response {
    let job_id = job.id;

    if let Err(e) = state.job_repository.create(&job).await {
        tracing::error!(error = %e, "Failed to create job record");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to create job: {}", e),
            }),
        )
            .into_response();
    }

    if wait {
        let completion = state.runner.run_job(&job).await;
        return (
            StatusCode::OK,
            Json(SubmitResponse {
                job_id: job_id.to_string(),
                status: completion.status.to_string(),
                record_id: completion.record_id.map(|id| id.to_string()),
                text: completion.text,
                error_message: completion.error_message,
                message: "Transcription finished".to_string(),
            }),
        )
            .into_response();
    }

    if let Err(e) = state.job_queue.enqueue(TranscriptionMessage { job }).await {
        tracing::error!(error = %e, "Failed to enqueue transcription job");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Transcription queue unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(job_id = %job_id, "Transcription job enqueued");

    (
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            job_id: job_id.to_string(),
            status: "QUEUED".to_string(),
            record_id: None,
            text: None,
            error_message: None,
            message: "Transcription started".to_string(),
        }),
    )
        .into_response()
}
