mod audio_source;
mod ids;
mod job;
mod job_status;
mod outcome;
mod record;

pub use audio_source::AudioSource;
pub use ids::{JobId, RecordId, TranscriptId};
pub use job::Job;
pub use job_status::JobStatus;
pub use outcome::{FailureDetail, PipelineOutcome, SuccessPayload};
pub use record::{derive_title, render_section, RecordStatus};
