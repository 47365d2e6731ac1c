//! Error type for the entity database library.
//!
//! Only hard failures live here. Files that fail to resolve are not errors,
//! they are recorded as [`Diagnostic`](crate::Diagnostic) lines instead.

/// Error type for archive scanning and database persistence
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Archive member not found: {0}")]
    MissingMember(String),
}

impl Error {
    /// Build a transport error for a failed request
    pub fn transport(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, Error>;
