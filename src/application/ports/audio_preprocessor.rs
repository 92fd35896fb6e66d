use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Size-gated re-encoding of local audio before upload. Files at or under
/// the threshold pass through unchanged; oversized files are transcoded to a
/// new path. The input file is never deleted here.
#[async_trait]
pub trait AudioPreprocessor: Send + Sync {
    async fn prepare(&self, path: &Path) -> Result<PathBuf, PreprocessError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("cannot inspect audio file: {0}")]
    Inspect(String),
    #[error("transcoding failed: {0}")]
    TranscodeFailed(String),
}
