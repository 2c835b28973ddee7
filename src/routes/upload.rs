use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use std::path::Path;

use crate::app_state::AppState;
use crate::models::api::UploadResponse;

/// POST /upload-image — store an uploaded image and enqueue a scenario job.
///
/// The bytes are written as-is; no decode check happens here. An upload that
/// turns out not to be an image fails at worker time, not at submission.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, StatusCode> {
    let mut stored: Option<(String, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("file") {
            // Keep only the final path component of the client filename.
            let filename = field
                .file_name()
                .and_then(|raw| Path::new(raw).file_name())
                .and_then(|name| name.to_str())
                .map(str::to_owned)
                .ok_or(StatusCode::BAD_REQUEST)?;

            let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;

            tokio::fs::create_dir_all(&state.uploads_dir)
                .await
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

            let dest = state.uploads_dir.join(&filename);
            tokio::fs::write(&dest, &data)
                .await
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

            stored = Some((filename, dest.to_string_lossy().into_owned()));
        }
    }

    let (filename, source_path) = stored.ok_or(StatusCode::BAD_REQUEST)?;

    let job_id = state.dispatcher.submit(&source_path).await.map_err(|e| {
        tracing::error!(error = %e, "failed to enqueue scenario job");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(UploadResponse {
        status: "processing".to_string(),
        original_url: format!("/storage/uploads/{filename}"),
        job_id,
        message: "Processing started. Check /debug-files for results.".to_string(),
    }))
}
