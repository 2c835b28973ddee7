use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One named filtered derivative of a source image.
///
/// The set is closed: every job produces exactly these variants, in
/// declaration order (noir, sketch, sepia).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Noir,
    Sketch,
    Sepia,
}

/// The immutable unit of work handed to the queue.
///
/// Exactly one envelope is created per accepted upload. The worker checks
/// that `source_path` still exists at pickup time; the dispatcher does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEnvelope {
    pub job_id: Uuid,
    pub source_path: String,
    pub submitted_at: DateTime<Utc>,
}

impl JobEnvelope {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            source_path: source_path.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Terminal status of a processed job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Completed,
    Failed,
}

/// Result of one variant's filter-and-encode step.
///
/// An encode failure is isolated to its variant: the error is recorded here
/// and the job still attempts the remaining variants.
#[derive(Debug, Clone, Serialize)]
pub struct VariantOutcome {
    pub variant: Variant,
    pub output_path: PathBuf,
    pub error: Option<String>,
}

/// Terminal report for a job that at least decoded successfully.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub variants: Vec<VariantOutcome>,
}

impl JobReport {
    /// Number of variants whose encode step failed.
    pub fn failed_variants(&self) -> usize {
        self.variants.iter().filter(|v| v.error.is_some()).count()
    }
}
