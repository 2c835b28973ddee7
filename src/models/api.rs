use serde::Serialize;
use uuid::Uuid;

/// Response after submitting an image for processing.
///
/// Always optimistic: the job has only been enqueued, and actual
/// success or failure is observable via the storage directory.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub original_url: String,
    pub job_id: Uuid,
    pub message: String,
}
