use std::sync::Arc;
use uuid::Uuid;

use crate::models::job::JobEnvelope;
use crate::services::queue::{JobQueue, QueueError};

/// Converts an accepted upload into a queued job envelope.
///
/// `submit` returns as soon as the envelope is on the queue; it never blocks
/// on processing and never inspects the image bytes (a non-decodable upload
/// only surfaces at worker time).
pub struct Dispatcher {
    queue: Arc<JobQueue>,
}

impl Dispatcher {
    pub fn new(queue: Arc<JobQueue>) -> Self {
        Self { queue }
    }

    /// Enqueue a job for the stored image at `source_path` and return its
    /// tracking identity.
    pub async fn submit(&self, source_path: &str) -> Result<Uuid, QueueError> {
        let envelope = JobEnvelope::new(source_path);
        self.queue.enqueue(&envelope).await?;

        metrics::counter!("scenario_jobs_total").increment(1);
        if let Ok(depth) = self.queue.queue_depth().await {
            metrics::gauge!("scenario_queue_depth").set(depth as f64);
        }

        tracing::info!(
            job_id = %envelope.job_id,
            source_path,
            "scenario job enqueued"
        );

        Ok(envelope.job_id)
    }
}
