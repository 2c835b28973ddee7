use std::path::PathBuf;
use std::sync::Arc;

use crate::services::{dispatch::Dispatcher, queue::JobQueue};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<JobQueue>,
    pub dispatcher: Arc<Dispatcher>,
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(queue: JobQueue, uploads_dir: PathBuf) -> Self {
        let queue = Arc::new(queue);
        let dispatcher = Arc::new(Dispatcher::new(queue.clone()));
        Self {
            queue,
            dispatcher,
            uploads_dir,
        }
    }
}
