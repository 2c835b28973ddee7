use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

use vision_scenarios::{
    config::AppConfig,
    models::job::JobStatus,
    services::{pipeline, queue::JobQueue, queue::QueueError},
};

const POLL_INTERVAL_MS: u64 = 1000; // 1 second

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting scenario worker");

    // Load configuration
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Install a Prometheus exporter with its own scrape listener; unlike the
    // API server, the worker has no axum router to hang a /metrics route on.
    let metrics_addr: SocketAddr = config
        .metrics_addr
        .parse()
        .expect("Invalid metrics address");
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .expect("Failed to install Prometheus metrics exporter");

    // Register worker-side metrics
    metrics::describe_histogram!(
        "scenario_processing_seconds",
        "Time to process one scenario job"
    );
    metrics::describe_counter!(
        "scenario_jobs_completed",
        "Total scenario jobs that reached Completed"
    );
    metrics::describe_counter!(
        "scenario_jobs_failed",
        "Total scenario jobs that reached Failed"
    );

    // Initialize the job queue
    tracing::info!("Connecting to Redis job queue");
    let queue = Arc::new(JobQueue::new(&config.redis_url).expect("Failed to initialize job queue"));

    tracing::info!(
        concurrency = config.worker_concurrency,
        job_timeout_secs = config.job_timeout_secs,
        "Worker ready, starting job processing loops"
    );

    // Independent poll loops over the shared queue; no cross-job ordering.
    let mut handles = Vec::new();
    for worker_id in 0..config.worker_concurrency {
        let queue = queue.clone();
        let timeout_secs = config.job_timeout_secs;
        handles.push(tokio::spawn(async move {
            worker_loop(worker_id, queue, timeout_secs).await;
        }));
    }

    for handle in handles {
        // Loops only return if they panic; propagate that as a crash.
        handle.await.expect("worker loop panicked");
    }
}

async fn worker_loop(worker_id: usize, queue: Arc<JobQueue>, timeout_secs: u64) {
    loop {
        match process_next_job(&queue, timeout_secs).await {
            Ok(true) => {
                // Job processed, continue immediately
                tracing::debug!(worker_id, "job processed, checking for next job");
            }
            Ok(false) => {
                // No job available, sleep before next poll
                tracing::trace!(worker_id, "no jobs available, sleeping");
                sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
            Err(e) => {
                tracing::error!(worker_id, error = %e, "queue error, backing off");
                sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
        }
    }
}

/// Process the next job from the queue.
/// Returns Ok(true) if a job was processed, Ok(false) if no job available.
async fn process_next_job(queue: &JobQueue, timeout_secs: u64) -> Result<bool, QueueError> {
    let envelope = match queue.dequeue().await? {
        Some(e) => e,
        None => return Ok(false),
    };

    tracing::info!(
        job_id = %envelope.job_id,
        source_path = %envelope.source_path,
        "processing scenario job"
    );

    let start = Instant::now();
    match pipeline::run_job_with_deadline(&envelope, timeout_secs).await {
        Ok(report) => {
            metrics::histogram!("scenario_processing_seconds")
                .record(start.elapsed().as_secs_f64());
            metrics::counter!("scenario_jobs_completed").increment(1);

            tracing::info!(
                job_id = %report.job_id,
                status = ?report.status,
                variants_written = report.variants.len() - report.failed_variants(),
                variants_failed = report.failed_variants(),
                "job completed"
            );
        }
        Err(e) => {
            // Terminal by design: missing sources and broken images do not
            // become retries. The failure is recorded and the pool moves on.
            metrics::counter!("scenario_jobs_failed").increment(1);
            tracing::error!(
                job_id = %envelope.job_id,
                status = ?JobStatus::Failed,
                error = %e,
                "job failed"
            );
        }
    }

    queue.complete(&envelope).await?;
    Ok(true)
}
