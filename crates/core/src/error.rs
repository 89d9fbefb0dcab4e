//! Error types for the ChatRelay domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; none of them is fatal to the
//! host. They are turned into display text at the agent loop or the session.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single call to the text generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The endpoint answered with a status outside `200..300`.
    #[error("Endpoint rejected the request (status: {status}): {body}")]
    RemoteRejected { status: u16, body: String },

    /// DNS, connect, reset, timeout: the request never got an answer.
    #[error("Transport failed: {0}")]
    TransportFailed(String),

    /// The request could not be built (bad base URL, empty prompt).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Failure of a workspace read or write.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied for {}: {reason}", path.display())]
    PermissionDenied { path: PathBuf, reason: String },

    #[error("File {} is not valid UTF-8 text", path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("Path '{path}' rejected: {reason}")]
    PathRejected { path: String, reason: String },

    #[error("I/O error on {}: {reason}", path.display())]
    Other { path: PathBuf, reason: String },
}

impl WorkspaceError {
    /// Classify a `std::io::Error` raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => WorkspaceError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => WorkspaceError::PermissionDenied {
                path,
                reason: err.to_string(),
            },
            _ => WorkspaceError::Other {
                path,
                reason: err.to_string(),
            },
        }
    }
}
