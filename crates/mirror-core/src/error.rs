//! Error types for mirror-core

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more required settings were not provided
    #[error("Missing required settings: {}", names.join(", "))]
    MissingSettings { names: Vec<&'static str> },

    /// The check interval could not be parsed
    #[error("Invalid check interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The download request could not be sent or failed in transit
    #[error("Error downloading {artifact}: {source}")]
    Request {
        artifact: String,
        #[source]
        source: reqwest::Error,
    },

    /// The source answered the download with a non-success status
    #[error("Failed to download {artifact}: HTTP status {status}")]
    HttpStatus {
        artifact: String,
        status: reqwest::StatusCode,
    },

    /// The response body broke off before it was fully received
    #[error("Error receiving body of {artifact}: {source}")]
    Body {
        artifact: String,
        #[source]
        source: reqwest::Error,
    },

    /// The artifact was placed but its Last-Modified header was unusable
    #[error("Error parsing Last-Modified header {value:?} for {artifact}")]
    InvalidLastModified { artifact: String, value: String },

    /// Writing, moving, or stamping the local file failed
    #[error("Error storing {artifact}: {source}")]
    Store {
        artifact: String,
        #[source]
        source: mirror_fs::Error,
    },
}

impl Error {
    pub(crate) fn store(artifact: &str) -> impl FnOnce(mirror_fs::Error) -> Self + '_ {
        move |source| Self::Store {
            artifact: artifact.to_string(),
            source,
        }
    }
}
