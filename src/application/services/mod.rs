mod pipeline;
mod poller;
mod queue;
mod result_persister;
mod runner;

pub use pipeline::TranscriptionPipeline;
pub use poller::{poll_until_terminal, PollOutcome, PollPolicy};
pub use queue::{JobQueue, QueueClosed, TranscriptionMessage, TranscriptionWorker};
pub use result_persister::ResultPersister;
pub use runner::{JobCompletion, JobRunner};
