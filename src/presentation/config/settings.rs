use std::path::PathBuf;

use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub post_processing: PostProcessingSettings,
    pub media: MediaSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub api_key: String,
    /// Override for tests and self-hosted gateways; None means the public
    /// provider endpoint.
    pub base_url: Option<String>,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostProcessingSettings {
    /// Default for submissions that do not specify `post_process`.
    pub enabled: bool,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    /// Directory uploaded audio is spooled to until its job terminates.
    pub spool_dir: PathBuf,
    pub size_threshold_bytes: u64,
    /// Request-body cap for the upload endpoint; kept well above the
    /// transcoding threshold so oversized files can be received at all.
    pub max_upload_bytes: usize,
    pub transcoder_bin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Assemble settings from the environment. The two provider credentials
    /// are injected this way on every deployment; everything else has a
    /// workable default.
    pub fn from_env() -> Self {
        Self {
            environment: Environment::try_from(env_or("APP_ENV", "local"))
                .unwrap_or(Environment::Local),
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parse_or("SERVER_PORT", 3000),
            },
            transcription: TranscriptionSettings {
                api_key: env_or("ASSEMBLYAI_API_KEY", ""),
                base_url: std::env::var("ASSEMBLYAI_BASE_URL").ok(),
                poll_interval_secs: env_parse_or("POLL_INTERVAL_SECS", 5),
                max_poll_attempts: env_parse_or("MAX_POLL_ATTEMPTS", 720),
            },
            post_processing: PostProcessingSettings {
                enabled: env_parse_or("POST_PROCESSING_ENABLED", true),
                api_key: env_or("OPENAI_API_KEY", ""),
                base_url: std::env::var("OPENAI_BASE_URL").ok(),
                model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            },
            media: MediaSettings {
                spool_dir: PathBuf::from(env_or("MEDIA_SPOOL_DIR", "/tmp/skrivari-spool")),
                size_threshold_bytes: env_parse_or("MEDIA_SIZE_THRESHOLD_BYTES", 25 * 1024 * 1024),
                max_upload_bytes: env_parse_or("MEDIA_MAX_UPLOAD_BYTES", 256 * 1024 * 1024),
                transcoder_bin: env_or("TRANSCODER_BIN", "ffmpeg"),
            },
            logging: LoggingSettings {
                level: env_or("LOG_LEVEL", "info"),
                enable_json: env_parse_or("LOG_JSON", false),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
