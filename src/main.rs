mod app_state;
mod config;
mod models;
mod routes;
mod services;

use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use app_state::AppState;
use config::AppConfig;
use services::queue::JobQueue;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing vision-scenarios server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_histogram!(
        "scenario_processing_seconds",
        "Time to process one scenario job"
    );
    metrics::describe_counter!("scenario_jobs_total", "Total scenario jobs submitted");
    metrics::describe_counter!(
        "scenario_jobs_completed",
        "Total scenario jobs that reached Completed"
    );
    metrics::describe_counter!(
        "scenario_jobs_failed",
        "Total scenario jobs that reached Failed"
    );
    metrics::describe_gauge!(
        "scenario_queue_depth",
        "Current number of pending jobs in the queue"
    );

    // Make sure the uploads directory exists before serving /storage
    let uploads_dir = config.uploads_dir();
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .expect("Failed to create uploads directory");

    // Initialize Redis job queue
    tracing::info!("Connecting to Redis job queue");
    let queue = JobQueue::new(&config.redis_url).expect("Failed to initialize job queue");

    // Create shared application state
    let state = AppState::new(queue, uploads_dir);

    // Build API routes
    let app = Router::new()
        .route("/upload-image", post(routes::upload::upload_image))
        .route("/debug-files", get(routes::files::debug_files))
        .route("/health", get(routes::health::health_check))
        .with_state(state)
        // Read-only result discovery over the storage root
        .nest_service("/storage", ServeDir::new(&config.storage_root))
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)); // 10 MB limit

    tracing::info!("Starting vision-scenarios on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
