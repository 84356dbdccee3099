//! # Content Index Trigger
//!
//! This crate turns bursts of repository change events into coarse-grained
//! search index decisions. A single page edit can emit dozens of raw events;
//! each delivered batch results in exactly one action for one content item:
//!
//! - **Reindex**: the item is submitted to the `indexpages` and `indexDam`
//!   categories
//! - **Remove**: the item's index entry is dropped
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Content Index Trigger                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  EventBatch ──► BatchCollapser ──► IndexIntent ──► Indexer      │
//! │                  │         │                        ▲           │
//! │                  ▼         ▼                        │           │
//! │             classify  PathNormalizer        IndexDispatcher     │
//! │                                                     │           │
//! │                                                     ▼           │
//! │                                            SolrConfigProvider   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use content_index_trigger::{IndexDispatcher, LoggingIndexer, TriggerConfig};
//! use content_index_observation::ListenerLifecycle;
//!
//! let config = TriggerConfig::load("trigger.toml").await?;
//! let dispatcher = Arc::new(IndexDispatcher::from_config(&config, Arc::new(LoggingIndexer))?);
//!
//! let mut lifecycle = ListenerLifecycle::new(repository, dispatcher, config.listener.clone());
//! lifecycle.activate().await?;
//! ```

pub mod classifier;
pub mod collapser;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod indexer;
pub mod normalizer;

pub use classifier::{IndexAction, classify};
pub use collapser::{BatchCollapser, IndexIntent};
pub use config::{SolrConfigProvider, SolrEndpoint, SolrServerConfig, TriggerConfig};
pub use dispatcher::{CallOutcome, DispatchReport, IndexCall, IndexDispatcher};
pub use error::{IndexerError, NormalizeError, Result, TriggerError};
pub use indexer::{IndexCategory, Indexer, LoggingIndexer};
pub use normalizer::{DEFAULT_METADATA_PREFIX, PathNormalizer};

// Re-export from dependencies for convenience
pub use content_index_observation::{
    ChangeEvent, EventBatch, EventKind, InMemoryRepository, ListenerConfig, ListenerLifecycle,
};
