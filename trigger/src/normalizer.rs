//! Reduces raw event paths to the content item they belong to.

use crate::error::NormalizeError;

/// Prefix of repository metadata segments.
pub const DEFAULT_METADATA_PREFIX: &str = "jcr:";

/// Strips metadata segments from event paths.
///
/// Raw events fire on metadata nodes and properties beneath a page
/// (`/content/site/page/jcr:content/title`). The logical item is the
/// nearest ancestor that is not metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNormalizer {
    marker: String,
}

impl PathNormalizer {
    /// Create a normalizer for a custom metadata prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            marker: format!("/{prefix}"),
        }
    }

    /// Reduce `raw_path` to its logical content item.
    ///
    /// Everything from the first metadata segment on is dropped. Paths
    /// without one are returned unchanged.
    pub fn normalize(&self, raw_path: &str) -> Result<String, NormalizeError> {
        if raw_path.is_empty() {
            return Err(NormalizeError::EmptyPath);
        }

        match raw_path.find(&self.marker) {
            Some(0) => Err(NormalizeError::MetadataAtRoot(raw_path.to_string())),
            Some(end) => Ok(raw_path[..end].to_string()),
            None => Ok(raw_path.to_string()),
        }
    }
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_METADATA_PREFIX)
    }
}
