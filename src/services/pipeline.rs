//! Per-job processing state machine.
//!
//! Received → Decoding → Filtering → Encoding → terminal. Decode-stage
//! failures (missing source, unreadable image) fail the whole job; an encode
//! failure is isolated to its variant and the job still completes with the
//! remaining variants written. Output paths are deterministic, so re-running
//! a delivered job simply overwrites the same files.
//!
//! Cancellation of an in-flight job is not supported; the only backstop for
//! a stuck job is the per-job deadline in [`run_job_with_deadline`].

use std::path::Path;
use std::time::Duration;

use strum::IntoEnumIterator;

use crate::models::job::{JobEnvelope, JobReport, JobStatus, Variant, VariantOutcome};
use crate::services::codec::{self, CodecError};
use crate::services::filters;
use crate::services::naming;

/// Run one job to a terminal state.
///
/// `Ok` means the source decoded and every variant was attempted (individual
/// encode failures are recorded on the report). `Err` means the job failed
/// before any output could be produced.
pub fn run_job(envelope: &JobEnvelope) -> Result<JobReport, PipelineError> {
    let source = Path::new(&envelope.source_path);
    tracing::info!(job_id = %envelope.job_id, path = %envelope.source_path, "job received");

    if !source.exists() {
        return Err(PipelineError::MissingSource {
            path: envelope.source_path.clone(),
        });
    }

    tracing::debug!(job_id = %envelope.job_id, "decoding source image");
    let raster = codec::decode(source).map_err(PipelineError::Decode)?;

    // Each variant reads the original raster, never a chained result, in the
    // fixed noir → sketch → sepia order.
    let mut variants = Vec::new();
    for variant in Variant::iter() {
        tracing::debug!(job_id = %envelope.job_id, %variant, "filtering");
        let output = filters::apply(variant, &raster);
        let output_path = naming::output_path(source, variant);

        let error = match codec::encode(&output, &output_path) {
            Ok(()) => {
                tracing::debug!(job_id = %envelope.job_id, %variant, path = %output_path.display(), "variant written");
                None
            }
            Err(e) => {
                tracing::warn!(job_id = %envelope.job_id, %variant, error = %e, "variant encode failed");
                Some(e.to_string())
            }
        };

        variants.push(VariantOutcome {
            variant,
            output_path,
            error,
        });
    }

    Ok(JobReport {
        job_id: envelope.job_id,
        status: JobStatus::Completed,
        variants,
    })
}

/// Run one job on the blocking thread pool under a processing deadline.
///
/// Expiry is a terminal failure with reason [`PipelineError::Timeout`],
/// reported like any other job failure.
pub async fn run_job_with_deadline(
    envelope: &JobEnvelope,
    timeout_secs: u64,
) -> Result<JobReport, PipelineError> {
    let job = envelope.clone();
    let task = tokio::task::spawn_blocking(move || run_job(&job));

    match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(joined) => joined?,
        Err(_) => Err(PipelineError::Timeout {
            seconds: timeout_secs,
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Source file absent at worker pickup. Terminal: the file is gone,
    /// retrying cannot help.
    #[error("source file missing: {path}")]
    MissingSource { path: String },

    /// Source unreadable or not a recognized image. Terminal.
    #[error("decode failed: {0}")]
    Decode(#[source] CodecError),

    /// Job exceeded its processing deadline. Terminal.
    #[error("job exceeded {seconds}s processing deadline")]
    Timeout { seconds: u64 },

    /// The blocking job task was cancelled or panicked.
    #[error("job task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}
