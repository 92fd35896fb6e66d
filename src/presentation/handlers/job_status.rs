use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::ErrorResponse;
use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub status: String,
    pub source: String,
    pub transcript_id: Option<String>,
    pub record_id: Option<String>,
    pub parent_document_id: Option<String>,
    pub post_processed: bool,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    match state.job_repository.get_by_id(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => {
            let response = JobStatusResponse {
                id: job.id.to_string(),
                status: job.status.to_string(),
                source: job.source.describe(),
                transcript_id: job.transcript_id,
                record_id: job.record_id.map(|id| id.to_string()),
                parent_document_id: job.parent_document_id.map(|id| id.to_string()),
                post_processed: job.post_processed,
                error_message: job.error_message,
                created_at: job.created_at.to_rfc3339(),
                updated_at: job.updated_at.to_rfc3339(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {}", job_id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response()
        }
    }
}
