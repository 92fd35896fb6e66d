use std::time::Duration;

use crate::application::ports::{PollStatus, ProviderError, TranscriptionProvider};
use crate::domain::TranscriptId;

/// How the retry-until-terminal loop behaves. The provider can legitimately
/// take minutes on long audio, so the interval is fixed rather than backed
/// off, and the cap is generous.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed(String),
    Failed(String),
    TimedOut { attempts: u32 },
}

/// The one polling state machine every driver shares. Terminates only on a
/// terminal provider status, a transport error, or attempt exhaustion; each
/// observed non-terminal status is reported through `observer` so callers
/// can surface progress without duplicating the loop.
pub async fn poll_until_terminal<P, F>(
    provider: &P,
    id: &TranscriptId,
    policy: PollPolicy,
    mut observer: F,
) -> Result<PollOutcome, ProviderError>
where
    P: TranscriptionProvider + ?Sized,
    F: FnMut(&str),
{
    for attempt in 1..=policy.max_attempts {
        match provider.poll(id).await? {
            PollStatus::Completed(text) => return Ok(PollOutcome::Completed(text)),
            PollStatus::Failed(detail) => return Ok(PollOutcome::Failed(detail)),
            PollStatus::InProgress(status) => {
                observer(&status);
                tracing::debug!(
                    transcript_id = %id,
                    status = %status,
                    attempt,
                    "Transcript still in progress"
                );
            }
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Ok(PollOutcome::TimedOut {
        attempts: policy.max_attempts,
    })
}
