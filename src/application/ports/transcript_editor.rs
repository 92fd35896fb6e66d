use async_trait::async_trait;

/// Language-model cleanup pass over a raw transcript. One attempt only; the
/// caller falls back to the raw text on any error.
#[async_trait]
pub trait TranscriptEditor: Send + Sync {
    async fn clean(&self, raw_text: &str) -> Result<String, PostProcessError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PostProcessError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
