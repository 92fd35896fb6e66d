mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LoggingSettings, MediaSettings, PostProcessingSettings, ServerSettings, Settings,
    TranscriptionSettings,
};
