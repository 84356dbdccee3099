//! Turns delivered change batches into indexer calls.

use std::sync::Arc;

use async_trait::async_trait;
use content_index_observation::{EventBatch, EventListener};
use tracing::{debug, error, info, warn};

use crate::classifier::IndexAction;
use crate::collapser::{BatchCollapser, IndexIntent};
use crate::config::{SolrConfigProvider, TriggerConfig};
use crate::error::{IndexerError, Result, TriggerError};
use crate::indexer::{IndexCategory, Indexer};
use crate::normalizer::PathNormalizer;

/// Receives change batches and triggers indexing or removal.
///
/// Holds no mutable state, so one dispatcher can serve concurrent
/// deliveries. The search endpoint is resolved again for every batch.
pub struct IndexDispatcher {
    /// Search server coordinates.
    solr: Arc<dyn SolrConfigProvider>,

    /// Downstream indexer.
    indexer: Arc<dyn Indexer>,

    /// Batch to intent reduction.
    collapser: BatchCollapser,
}

impl IndexDispatcher {
    /// Create a dispatcher with the default metadata prefix.
    pub fn new(solr: Arc<dyn SolrConfigProvider>, indexer: Arc<dyn Indexer>) -> Self {
        Self {
            solr,
            indexer,
            collapser: BatchCollapser::default(),
        }
    }

    /// Create a dispatcher from a configuration.
    ///
    /// The configuration is validated first, so a config built in code gets
    /// the same checks as one loaded from TOML.
    pub fn from_config(config: &TriggerConfig, indexer: Arc<dyn Indexer>) -> Result<Self> {
        config.validate()?;
        Ok(
            Self::new(Arc::new(config.solr.clone()), indexer).with_collapser(BatchCollapser::new(
                PathNormalizer::with_prefix(&config.metadata_prefix),
            )),
        )
    }

    /// Replace the batch collapser.
    pub fn with_collapser(mut self, collapser: BatchCollapser) -> Self {
        self.collapser = collapser;
        self
    }

    /// Process one batch.
    ///
    /// Fails without calling the indexer when the batch is empty or its
    /// first event cannot be normalized. Indexer failures do not fail the
    /// dispatch; they are logged and listed in the report.
    pub async fn dispatch(&self, batch: &EventBatch) -> Result<DispatchReport> {
        for event in batch {
            debug!(
                kind = %event.kind,
                path = %event.path,
                actor = %event.actor_id,
                timestamp = %event.timestamp,
                identifier = %event.source_identifier,
                "observed change event"
            );
        }

        let base_url = self.solr.endpoint().base_url();
        let intent = self.collapser.collapse(batch)?;
        let path = intent.logical_path.as_str();

        let mut outcomes = Vec::new();
        match intent.action {
            IndexAction::Reindex => {
                info!(kind = %intent.kind, path, "event for solr index found");
                for category in IndexCategory::REINDEX_ORDER {
                    let result = self.indexer.index(path, category, &base_url).await;
                    if let Err(e) = &result {
                        warn!(
                            indexer = self.indexer.name(),
                            %category,
                            path,
                            "index call failed: {e}"
                        );
                    }
                    outcomes.push(CallOutcome::new(IndexCall::Index(category), result));
                }
            }
            IndexAction::Remove => {
                info!(kind = %intent.kind, path, "event for remove solr index found");
                let result = self.indexer.remove(path, &base_url).await;
                if let Err(e) = &result {
                    warn!(indexer = self.indexer.name(), path, "remove call failed: {e}");
                }
                outcomes.push(CallOutcome::new(IndexCall::Remove, result));
            }
        }

        Ok(DispatchReport {
            intent,
            base_url,
            outcomes,
        })
    }
}

#[async_trait]
impl EventListener for IndexDispatcher {
    async fn on_event(&self, batch: EventBatch) {
        match self.dispatch(&batch).await {
            Ok(report) => debug!(
                path = %report.intent.logical_path,
                failed = report.failures().count(),
                "batch dispatched"
            ),
            Err(e @ TriggerError::EmptyBatch) => error!("{e}"),
            Err(e) => warn!(events = batch.len(), "dropping batch: {e}"),
        }
    }
}

/// A single call made to the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCall {
    /// `index` into a category.
    Index(IndexCategory),

    /// `remove`.
    Remove,
}

/// Result of one indexer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub call: IndexCall,
    pub error: Option<IndexerError>,
}

impl CallOutcome {
    fn new(call: IndexCall, result: std::result::Result<(), IndexerError>) -> Self {
        Self {
            call,
            error: result.err(),
        }
    }
}

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// The intent derived from the batch.
    pub intent: IndexIntent,

    /// Base URL handed to the indexer.
    pub base_url: String,

    /// Indexer calls in the order they were made.
    pub outcomes: Vec<CallOutcome>,
}

impl DispatchReport {
    /// Check if every indexer call succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.error.is_none())
    }

    /// The calls that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CallOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }
}
