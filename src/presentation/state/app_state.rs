use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::JobRepository;
use crate::application::services::{JobQueue, JobRunner};

pub struct AppState {
    pub job_repository: Arc<dyn JobRepository>,
    pub job_queue: JobQueue,
    /// Used directly by `wait: true` submissions, bypassing the queue.
    pub runner: Arc<JobRunner>,
    pub spool_dir: PathBuf,
    /// Request-body cap for uploads; must sit comfortably above the
    /// transcoding size threshold.
    pub max_upload_bytes: usize,
    /// Default for submissions that leave `post_process` unset.
    pub post_process_default: bool,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            job_repository: Arc::clone(&self.job_repository),
            job_queue: self.job_queue.clone(),
            runner: Arc::clone(&self.runner),
            spool_dir: self.spool_dir.clone(),
            max_upload_bytes: self.max_upload_bytes,
            post_process_default: self.post_process_default,
        }
    }
}
