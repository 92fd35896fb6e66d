use std::fmt;

/// What a finished pipeline run produced. Stays structured all the way to the
/// content-store edge, where a failure collapses into a rendered body string.
pub type PipelineOutcome = Result<SuccessPayload, FailureDetail>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPayload {
    pub text: String,
    pub post_processed: bool,
}

/// Failure kinds that reach the persistence stage as user-visible records.
/// Post-processing failures are deliberately absent: they degrade to the raw
/// transcript and never terminate a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDetail {
    /// Transcoding an oversized file failed; carries the tool's diagnostics.
    Preprocess(String),
    /// Upload or job creation was rejected before a transcript id existed.
    Submission(String),
    /// Network failure while polling.
    Transport(String),
    /// The provider reported a terminal failed status.
    Provider(String),
    /// The bounded poll loop exhausted its attempts.
    Timeout { attempts: u32 },
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureDetail::Preprocess(detail) => write!(f, "audio preprocessing failed: {}", detail),
            FailureDetail::Submission(detail) => write!(f, "submission failed: {}", detail),
            FailureDetail::Transport(detail) => write!(f, "network error while polling: {}", detail),
            FailureDetail::Provider(detail) => write!(f, "transcription failed: {}", detail),
            FailureDetail::Timeout { attempts } => write!(
                f,
                "transcription did not finish after {} status checks",
                attempts
            ),
        }
    }
}
