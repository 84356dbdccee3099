//! Configuration for the repository listener.

use serde::{Deserialize, Serialize};

use crate::event::{ChangeEvent, EventKind};

/// Subtree observed when nothing else is configured.
pub const DEFAULT_OBSERVED_PATH: &str = "/content/tcs";

/// Configuration for the indexing listener's subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenerConfig {
    /// Root of the observed subtree.
    pub observed_path: String,

    /// Whether descendants of `observed_path` are observed too.
    pub recursive: bool,
}

impl ListenerConfig {
    /// Create a listener config for the given subtree.
    pub fn new(observed_path: impl Into<String>) -> Self {
        Self {
            observed_path: observed_path.into(),
            recursive: true,
        }
    }

    /// Only observe the node itself and its direct children.
    pub fn non_recursive(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Build the subscription filter for this config.
    ///
    /// Always covers every kind in [`EventKind::ALL`] so removals and moves
    /// are never filtered out.
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            kinds: EventKind::ALL.to_vec(),
            path: self.observed_path.clone(),
            recursive: self.recursive,
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OBSERVED_PATH)
    }
}

/// What a listener is registered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Accepted kinds.
    pub kinds: Vec<EventKind>,

    /// Observed path.
    pub path: String,

    /// Whether the whole subtree below `path` is observed.
    pub recursive: bool,
}

impl EventFilter {
    /// Check if an event passes this filter.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        self.kinds.contains(&event.kind) && self.covers_path(&event.path)
    }

    /// Check if a path lies in the observed area.
    pub fn covers_path(&self, path: &str) -> bool {
        let root = self.path.trim_end_matches('/');
        if path == self.path || path == root {
            return true;
        }

        let Some(rest) = path.strip_prefix(root).and_then(|r| r.strip_prefix('/')) else {
            return false;
        };

        self.recursive || !rest.contains('/')
    }
}
