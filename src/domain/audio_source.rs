use std::path::PathBuf;

/// The audio a job was submitted with. A `LocalFile` is owned exclusively by
/// its job until the job reaches a terminal state; cleanup of spooled files
/// happens in the runner, never in the preprocessor.
#[derive(Debug, Clone)]
pub enum AudioSource {
    RemoteUrl(String),
    LocalFile {
        path: PathBuf,
        original_filename: String,
        /// Spooled uploads are deleted after the job terminates.
        delete_after: bool,
    },
}

impl AudioSource {
    /// Filename used for result-record titling, when one exists.
    pub fn filename(&self) -> Option<&str> {
        match self {
            AudioSource::RemoteUrl(_) => None,
            AudioSource::LocalFile {
                original_filename, ..
            } => Some(original_filename.as_str()),
        }
    }

    /// Short description for job listings and logs.
    pub fn describe(&self) -> String {
        match self {
            AudioSource::RemoteUrl(url) => url.clone(),
            AudioSource::LocalFile {
                original_filename, ..
            } => original_filename.clone(),
        }
    }
}
