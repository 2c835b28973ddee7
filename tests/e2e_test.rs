//! End-to-end tests against a running deployment
//!
//! These tests require:
//! 1. Redis running
//! 2. API server running on configured port
//! 3. Worker process running
//!
//! Run with: cargo test --test e2e_test -- --ignored --nocapture
//!
//! Set API_BASE_URL to override default (http://localhost:8000) and
//! WORKER_METRICS_URL for the worker's scrape listener (http://localhost:9000)

use std::time::Duration;

use image::{Rgb, RgbImage};
use serde::Deserialize;

#[derive(Deserialize)]
struct UploadResponse {
    status: String,
    original_url: String,
    job_id: uuid::Uuid,
}

#[derive(Deserialize)]
struct FileListing {
    files: Vec<String>,
}

/// Get base URL from env or default to localhost
fn get_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn encode_test_png() -> Vec<u8> {
    let img = RgbImage::from_fn(100, 100, |x, y| Rgb([x as u8, y as u8, 77]));
    let mut bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )
    .expect("Failed to encode test image");
    bytes
}

#[tokio::test]
#[ignore] // Requires running API server, worker, and Redis
async fn test_e2e_health_check() {
    let base_url = get_base_url();
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Health check failed");

    assert!(
        response.status().is_success(),
        "Health check returned non-success status: {}",
        response.status()
    );
}

#[tokio::test]
#[ignore] // Requires running API server, worker, and Redis
async fn test_e2e_worker_exposes_job_metrics() {
    let base_url = get_base_url();
    let metrics_url = std::env::var("WORKER_METRICS_URL")
        .unwrap_or_else(|_| "http://localhost:9000".to_string());
    let client = reqwest::Client::new();

    // Drive one job through the worker so its counters have been recorded.
    let part = reqwest::multipart::Part::bytes(encode_test_png())
        .file_name(format!("e2e_metrics_{}.png", uuid::Uuid::new_v4()))
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);
    let response = client
        .post(format!("{}/upload-image", base_url))
        .multipart(form)
        .send()
        .await
        .expect("Upload failed");
    assert!(response.status().is_success());

    // Completed and processing-time metrics appear on the worker's own
    // scrape listener once the job lands.
    let mut seen = false;
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let body = client
            .get(&metrics_url)
            .send()
            .await
            .expect("Worker metrics scrape failed")
            .text()
            .await
            .expect("Body read failed");

        if body.contains("scenario_jobs_completed")
            && body.contains("scenario_processing_seconds")
        {
            seen = true;
            break;
        }
    }
    assert!(seen, "worker metrics did not appear within 30s");
}

#[tokio::test]
#[ignore] // Requires running API server, worker, and Redis
async fn test_e2e_upload_produces_variants() {
    let base_url = get_base_url();
    let client = reqwest::Client::new();

    // Unique filename so output paths never collide across test runs
    let filename = format!("e2e_{}.png", uuid::Uuid::new_v4());

    // 1. Upload the image
    let part = reqwest::multipart::Part::bytes(encode_test_png())
        .file_name(filename.clone())
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = client
        .post(format!("{}/upload-image", base_url))
        .multipart(form)
        .send()
        .await
        .expect("Upload failed");
    assert!(response.status().is_success());

    let upload: UploadResponse = response.json().await.expect("Bad upload response");
    assert_eq!(upload.status, "processing");
    assert_eq!(upload.original_url, format!("/storage/uploads/{filename}"));
    println!("uploaded, job_id: {}", upload.job_id);

    // 2. Poll /debug-files until all three derivative names appear
    let stem = filename.trim_end_matches(".png");
    let expected: Vec<String> = ["noir", "sketch", "sepia"]
        .iter()
        .map(|tag| format!("{stem}_scenario_{tag}.jpg"))
        .collect();

    let mut all_present = false;
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let listing: FileListing = client
            .get(format!("{}/debug-files", base_url))
            .send()
            .await
            .expect("Listing failed")
            .json()
            .await
            .expect("Bad listing response");

        if expected.iter().all(|name| listing.files.contains(name)) {
            all_present = true;
            break;
        }
    }
    assert!(all_present, "variants did not appear within 30s");

    // 3. Each variant must be retrievable and decodable at 100x100
    for name in &expected {
        let bytes = client
            .get(format!("{}/storage/uploads/{}", base_url, name))
            .send()
            .await
            .expect("Fetch failed")
            .bytes()
            .await
            .expect("Body read failed");

        let decoded = image::load_from_memory(&bytes).expect("Variant not decodable");
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
    }
}
