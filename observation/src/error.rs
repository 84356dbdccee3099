//! Error types for repository observation.

use thiserror::Error;

/// Result type alias for observation operations.
pub type Result<T> = std::result::Result<T, ObservationError>;

/// Errors that can occur while observing a content repository.
#[derive(Error, Debug)]
pub enum ObservationError {
    /// Opening a privileged session failed.
    #[error("repository login failed: {0}")]
    LoginFailed(String),

    /// The event listener could not be registered.
    #[error("failed to register event listener on {path}: {reason}")]
    Registration { path: String, reason: String },

    /// The registration handle is not known to the observation manager.
    #[error("unknown listener registration: {0}")]
    UnknownRegistration(u64),

    /// A raw event type code outside the observed kind set.
    #[error("unknown event kind code: {0}")]
    UnknownEventKind(u32),

    /// The session is no longer usable.
    #[error("session error: {0}")]
    Session(String),
}
