use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use super::submit::dispatch_job;
use super::ErrorResponse;
use crate::domain::{AudioSource, Job, RecordId};
use crate::presentation::state::AppState;

/// Multipart upload entry point. The file field is spooled to disk and the
/// job owns that copy until it terminates; optional text fields
/// `parent_document_id`, `post_process` and `wait` mirror the URL endpoint.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut spooled: Option<(std::path::PathBuf, String)> = None;
    let mut parent_document_id: Option<Uuid> = None;
    let mut post_process: Option<bool> = None;
    let mut wait = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return bad_request(format!("Failed to read multipart: {}", e));
            }
        };

        match field.name().unwrap_or_default() {
            "file" => {
                let filename = field.file_name().unwrap_or("audio").to_string();
                let data = match field.bytes().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read file bytes");
                        return bad_request(format!("Failed to read file: {}", e));
                    }
                };
                tracing::debug!(filename = %filename, bytes = data.len(), "Audio upload received");

                let spool_path = state
                    .spool_dir
                    .join(format!("{}-{}", Uuid::new_v4(), sanitize(&filename)));
                if let Err(e) = tokio::fs::create_dir_all(&state.spool_dir).await {
                    tracing::error!(error = %e, "Cannot create spool directory");
                    return server_error("Failed to store upload".to_string());
                }
                if let Err(e) = tokio::fs::write(&spool_path, &data).await {
                    tracing::error!(error = %e, path = %spool_path.display(), "Cannot spool upload");
                    return server_error("Failed to store upload".to_string());
                }
                spooled = Some((spool_path, filename));
            }
            "parent_document_id" => {
                let text = field.text().await.unwrap_or_default();
                match Uuid::parse_str(text.trim()) {
                    Ok(uuid) => parent_document_id = Some(uuid),
                    Err(_) => return bad_request(format!("Invalid parent_document_id: {}", text)),
                }
            }
            "post_process" => {
                let text = field.text().await.unwrap_or_default();
                post_process = text.trim().parse().ok();
            }
            "wait" => {
                let text = field.text().await.unwrap_or_default();
                wait = text.trim().parse().unwrap_or(false);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let Some((path, original_filename)) = spooled else {
        tracing::warn!("Upload request with no file field");
        return bad_request("No file uploaded".to_string());
    };

    let source = AudioSource::LocalFile {
        path,
        original_filename,
        delete_after: true,
    };
    let job = Job::new(
        source,
        parent_document_id.map(RecordId::from_uuid),
        post_process.unwrap_or(state.post_process_default),
    );

    dispatch_job(&state, job, wait).await
}

fn sanitize(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

fn server_error(error: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error }),
    )
        .into_response()
}
