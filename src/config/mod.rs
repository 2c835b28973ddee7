use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8000"). Unused by worker processes.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Redis connection string for the job queue
    pub redis_url: String,

    /// Root directory holding uploads and their derivatives
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,

    /// Number of concurrent poll loops in the worker binary
    #[serde(default = "default_worker_concurrency")]
    pub worker_concurrency: usize,

    /// Per-job processing deadline in seconds; expiry fails the job
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,

    /// Prometheus scrape address for the worker binary (the API server
    /// exposes its own /metrics route instead)
    #[serde(default = "default_metrics_addr")]
    pub metrics_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("/storage")
}

fn default_worker_concurrency() -> usize {
    4
}

fn default_job_timeout_secs() -> u64 {
    60
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9000".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Directory where the upload handler stores incoming images.
    pub fn uploads_dir(&self) -> PathBuf {
        self.storage_root.join("uploads")
    }
}
