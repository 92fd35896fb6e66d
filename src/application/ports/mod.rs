mod audio_preprocessor;
mod content_store;
mod job_repository;
mod repository_error;
mod transcript_editor;
mod transcription_provider;

pub use audio_preprocessor::{AudioPreprocessor, PreprocessError};
pub use content_store::{ContentStore, ContentStoreError, RecordRevision, StoredRecord};
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
pub use transcript_editor::{PostProcessError, TranscriptEditor};
pub use transcription_provider::{PollStatus, ProviderError, TranscriptionProvider};
