//! Integration test: full submit → dequeue → process flow
//!
//! This test exercises the real queue hand-off:
//! 1. Dispatcher submission (enqueue + job identity)
//! 2. Worker-side dequeue and envelope round-trip
//! 3. Pipeline processing against a temp storage directory
//! 4. Queue completion (processing-list cleanup)
//!
//! Note: this requires a running Redis instance configured via REDIS_URL.
//! Run with: cargo test --test integration_test -- --ignored

use std::sync::Arc;

use image::{Rgb, RgbImage};
use strum::IntoEnumIterator;

use vision_scenarios::models::job::Variant;
use vision_scenarios::services::{dispatch::Dispatcher, naming, pipeline, queue::JobQueue};

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_submit_process_complete_flow() {
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let queue = Arc::new(JobQueue::new(&redis_url).expect("Failed to initialize queue"));
    let dispatcher = Dispatcher::new(queue.clone());

    // Stored image in a temp uploads directory
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("cat.png");
    RgbImage::from_pixel(100, 100, Rgb([120, 80, 40]))
        .save(&source)
        .expect("Failed to write test image");

    // 1. Submit: non-blocking, returns the job identity immediately
    let job_id = dispatcher
        .submit(source.to_string_lossy().as_ref())
        .await
        .expect("Failed to submit job");

    // 2. Dequeue: the envelope must round-trip intact
    let envelope = queue
        .dequeue()
        .await
        .expect("Failed to dequeue")
        .expect("No job in queue");

    assert_eq!(envelope.job_id, job_id);
    assert_eq!(envelope.source_path, source.to_string_lossy());

    // 3. Process: all three variants land at the predicted paths
    let report = pipeline::run_job_with_deadline(&envelope, 60)
        .await
        .expect("Job should complete");

    assert_eq!(report.failed_variants(), 0);
    for variant in Variant::iter() {
        assert!(naming::output_path(&source, variant).is_file());
    }

    // 4. Complete: remove from the processing list
    queue
        .complete(&envelope)
        .await
        .expect("Failed to complete job");
}

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_queue_health_and_depth() {
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let queue = JobQueue::new(&redis_url).expect("Failed to initialize queue");

    queue.health_check().await.expect("Redis should be reachable");
    queue.queue_depth().await.expect("LLEN should succeed");
}
