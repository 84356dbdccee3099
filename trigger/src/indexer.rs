//! Downstream index collaborators.
//!
//! The dispatcher only decides *what* should happen to a content item.
//! Building documents and talking to the search server is the job of an
//! [`Indexer`] implementation.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IndexerError;

/// Index partition a content item is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexCategory {
    /// Page content.
    #[serde(rename = "indexpages")]
    Pages,

    /// Digital asset metadata.
    #[serde(rename = "indexDam")]
    Dam,
}

impl IndexCategory {
    /// Categories submitted for a reindex, in call order.
    pub const REINDEX_ORDER: [IndexCategory; 2] = [IndexCategory::Pages, IndexCategory::Dam];

    /// Wire name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pages => "indexpages",
            Self::Dam => "indexDam",
        }
    }
}

impl fmt::Display for IndexCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submits and removes index entries.
///
/// Implementations own their timeout and retry policy. The same path may be
/// submitted repeatedly across batches, so calls should be idempotent.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Index the content item at `logical_path` into `category`.
    async fn index(
        &self,
        logical_path: &str,
        category: IndexCategory,
        base_url: &str,
    ) -> Result<(), IndexerError>;

    /// Remove the index entry of the content item at `logical_path`.
    async fn remove(&self, logical_path: &str, base_url: &str) -> Result<(), IndexerError>;
}

/// Indexer that only records what it would have done.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingIndexer;

#[async_trait]
impl Indexer for LoggingIndexer {
    fn name(&self) -> &str {
        "logging"
    }

    async fn index(
        &self,
        logical_path: &str,
        category: IndexCategory,
        base_url: &str,
    ) -> Result<(), IndexerError> {
        info!(path = logical_path, %category, url = base_url, "index page");
        Ok(())
    }

    async fn remove(&self, logical_path: &str, base_url: &str) -> Result<(), IndexerError> {
        info!(path = logical_path, url = base_url, "remove page index");
        Ok(())
    }
}
