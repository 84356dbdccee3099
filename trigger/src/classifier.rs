//! Maps change kinds to index actions.

use std::fmt;

use content_index_observation::EventKind;
use serde::{Deserialize, Serialize};

/// What the search index should do about a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexAction {
    /// (Re)index the item's content.
    Reindex,

    /// Drop the item from the index.
    Remove,
}

impl fmt::Display for IndexAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reindex => f.write_str("reindex"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Classify a change kind.
///
/// Additions and edits reindex; removals and moves drop the old entry.
pub const fn classify(kind: EventKind) -> IndexAction {
    match kind {
        EventKind::NodeAdded
        | EventKind::PropertyAdded
        | EventKind::PropertyChanged
        | EventKind::PropertyRemoved => IndexAction::Reindex,
        EventKind::NodeRemoved | EventKind::NodeMoved => IndexAction::Remove,
    }
}
