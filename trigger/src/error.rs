//! Error types for the index trigger.

use thiserror::Error;

/// Result type alias for trigger operations.
pub type Result<T> = std::result::Result<T, TriggerError>;

/// Errors that can occur while turning change batches into index calls.
#[derive(Error, Debug)]
pub enum TriggerError {
    /// A batch with no events reached the collapser.
    #[error("contract violation: empty event batch")]
    EmptyBatch,

    /// The event path could not be reduced to a content item.
    #[error("path normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Path normalization errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The event carried no path.
    #[error("empty path")]
    EmptyPath,

    /// The metadata marker is the first segment, leaving no content item.
    #[error("metadata segment at repository root: {0}")]
    MetadataAtRoot(String),
}

/// Errors reported by an [`Indexer`](crate::indexer::Indexer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexerError {
    /// The search engine could not be reached.
    #[error("request failed: {0}")]
    Request(String),

    /// The search engine refused the document or deletion.
    #[error("rejected {path}: {reason}")]
    Rejected { path: String, reason: String },
}
