use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct FileListing {
    pub path: String,
    pub total_files: usize,
    pub files: Vec<String>,
}

/// GET /debug-files — list the uploads directory.
///
/// Best-effort result discovery: a job's derivatives appear here (and under
/// /storage/uploads/) once it completes; there is no job-status store.
pub async fn debug_files(
    State(state): State<AppState>,
) -> Result<Json<FileListing>, StatusCode> {
    let mut entries = tokio::fs::read_dir(&state.uploads_dir)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    {
        if let Ok(name) = entry.file_name().into_string() {
            files.push(name);
        }
    }
    files.sort();

    Ok(Json(FileListing {
        path: state.uploads_dir.to_string_lossy().into_owned(),
        total_files: files.len(),
        files,
    }))
}
