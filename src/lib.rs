//! vision-scenarios
//!
//! Asynchronous image-scenario pipeline: an upload is stored on the
//! filesystem and queued as a job; a worker pool pulls jobs and materializes
//! three filtered derivatives (noir, sketch, sepia) next to the source file,
//! at deterministic paths computable without running the job.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
