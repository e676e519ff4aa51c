//! Platform errors.

/// A remote call that was rejected or could not be made.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("{operation} failed: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} rejected with status {status}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation}: not found")]
    NotFound { operation: String },

    #[error("AUTH is not set; add it to {0}")]
    MissingAuth(String),

    #[error("Invalid AUTH value: expected <uuid>:<key>")]
    InvalidAuth,

    #[error("Failed to read platform config {path}: {message}")]
    Config { path: String, message: String },
}

impl PlatformError {
    /// Whether the platform reported the target as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound { .. })
    }
}
