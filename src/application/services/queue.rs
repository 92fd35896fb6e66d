use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::services::JobRunner;
use crate::domain::Job;

/// Work item handed from a submission handler to the worker.
pub struct TranscriptionMessage {
    pub job: Job,
}

/// Explicit queue abstraction owning the channel into the worker pool.
/// Constructed once at process start and shared by reference through the
/// application state; there is no ambient global queue.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<TranscriptionMessage>,
}

impl JobQueue {
    /// Spawn the worker task and return the queue handle plus the worker's
    /// join handle for shutdown.
    pub fn start(runner: Arc<JobRunner>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let worker = TranscriptionWorker::new(receiver, runner);
        let handle = tokio::spawn(worker.run());
        (Self { sender }, handle)
    }

    pub async fn enqueue(&self, message: TranscriptionMessage) -> Result<(), QueueClosed> {
        self.sender.send(message).await.map_err(|_| QueueClosed)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("transcription queue is closed")]
pub struct QueueClosed;

/// Durable polling driver: once a message is accepted, the job runs to a
/// terminal state regardless of whether any client is still watching.
/// Messages are processed one at a time in arrival order.
pub struct TranscriptionWorker {
    receiver: mpsc::Receiver<TranscriptionMessage>,
    runner: Arc<JobRunner>,
}

impl TranscriptionWorker {
    pub fn new(receiver: mpsc::Receiver<TranscriptionMessage>, runner: Arc<JobRunner>) -> Self {
        Self { receiver, runner }
    }

    pub async fn run(mut self) {
        tracing::info!("Transcription worker started");
        while let Some(msg) = self.receiver.recv().await {
            let completion = self.runner.run_job(&msg.job).await;
            tracing::debug!(
                job_id = %msg.job.id,
                status = %completion.status,
                "Job reached terminal state"
            );
        }
        tracing::info!("Transcription worker stopped: channel closed");
    }
}
