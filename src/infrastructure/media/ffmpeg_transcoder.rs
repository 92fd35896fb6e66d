use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioPreprocessor, PreprocessError};

pub const DEFAULT_SIZE_THRESHOLD: u64 = 25 * 1024 * 1024;
const TARGET_BITRATE: &str = "64k";
const TARGET_SAMPLE_RATE: &str = "44100";

/// Re-encodes oversized audio with an external ffmpeg binary before upload.
/// Files at or under the threshold pass through untouched.
pub struct FfmpegTranscoder {
    bin: String,
    size_threshold: u64,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            bin: "ffmpeg".to_string(),
            size_threshold: DEFAULT_SIZE_THRESHOLD,
        }
    }

    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    pub fn with_size_threshold(mut self, threshold: u64) -> Self {
        self.size_threshold = threshold;
        self
    }

    fn output_path(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        input.with_file_name(format!("{}-compressed.mp3", stem))
    }

    fn transcode_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-b:a".to_string(),
            TARGET_BITRATE.to_string(),
            "-ar".to_string(),
            TARGET_SAMPLE_RATE.to_string(),
            output.display().to_string(),
        ]
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPreprocessor for FfmpegTranscoder {
    async fn prepare(&self, path: &Path) -> Result<PathBuf, PreprocessError> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| PreprocessError::Inspect(format!("{}: {}", path.display(), e)))?
            .len();

        if size <= self.size_threshold {
            return Ok(path.to_path_buf());
        }

        let output = Self::output_path(path);

        tracing::info!(
            input = %path.display(),
            output = %output.display(),
            bytes = size,
            "Audio exceeds size threshold, transcoding"
        );

        let result = Command::new(&self.bin)
            .args(Self::transcode_args(path, &output))
            .output()
            .await
            .map_err(|e| PreprocessError::TranscodeFailed(format!("cannot run {}: {}", self.bin, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(PreprocessError::TranscodeFailed(format!(
                "{} exited with {}: {}",
                self.bin,
                result.status,
                stderr.trim()
            )));
        }

        // An oversized original must never slip through silently.
        if tokio::fs::metadata(&output).await.is_err() {
            return Err(PreprocessError::TranscodeFailed(format!(
                "{} produced no output file",
                self.bin
            )));
        }

        Ok(output)
    }
}
