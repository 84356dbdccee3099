//! Collapses a delivered batch into a single index intent.

use content_index_observation::{EventBatch, EventKind};
use serde::{Deserialize, Serialize};

use crate::classifier::{IndexAction, classify};
use crate::error::{Result, TriggerError};
use crate::normalizer::PathNormalizer;

/// The one action taken for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexIntent {
    /// Reindex or remove.
    pub action: IndexAction,

    /// Content item the action applies to.
    pub logical_path: String,

    /// Kind of the event the intent was derived from.
    pub kind: EventKind,
}

/// Picks the representative event of a batch.
///
/// One edit of a page fans out into an event per touched component or
/// property, all with the same action and page. Only the first event is
/// looked at; the rest are ignored.
#[derive(Debug, Clone, Default)]
pub struct BatchCollapser {
    normalizer: PathNormalizer,
}

impl BatchCollapser {
    /// Create a collapser using the given normalizer.
    pub fn new(normalizer: PathNormalizer) -> Self {
        Self { normalizer }
    }

    /// Derive the intent for `batch`. An empty batch is a contract violation.
    pub fn collapse(&self, batch: &EventBatch) -> Result<IndexIntent> {
        let event = batch.first().ok_or(TriggerError::EmptyBatch)?;

        Ok(IndexIntent {
            action: classify(event.kind),
            logical_path: self.normalizer.normalize(&event.path)?,
            kind: event.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use content_index_observation::ChangeEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_uses_first_event() {
        let batch = EventBatch::new(vec![
            ChangeEvent::new(EventKind::PropertyChanged, "/content/tcs/page1/jcr:content/title"),
            ChangeEvent::new(EventKind::NodeRemoved, "/content/tcs/other"),
            ChangeEvent::new(EventKind::PropertyAdded, "/content/tcs/page2/jcr:content"),
        ]);

        let intent = BatchCollapser::default().collapse(&batch).unwrap();

        assert_eq!(
            intent,
            IndexIntent {
                action: IndexAction::Reindex,
                logical_path: "/content/tcs/page1".to_string(),
                kind: EventKind::PropertyChanged,
            }
        );
    }

    #[test]
    fn test_collapse_removal() {
        let batch = EventBatch::new(vec![
            ChangeEvent::new(EventKind::NodeMoved, "/content/tcs/page1"),
            ChangeEvent::new(EventKind::NodeAdded, "/content/tcs/archive/page1"),
        ]);

        let intent = BatchCollapser::default().collapse(&batch).unwrap();

        assert_eq!(intent.action, IndexAction::Remove);
        assert_eq!(intent.logical_path, "/content/tcs/page1");
    }

    #[test]
    fn test_empty_batch_is_contract_violation() {
        let err = BatchCollapser::default()
            .collapse(&EventBatch::default())
            .unwrap_err();
        assert!(matches!(err, TriggerError::EmptyBatch));
    }

    #[test]
    fn test_first_event_at_metadata_root_fails_batch() {
        let batch = EventBatch::new(vec![
            ChangeEvent::new(EventKind::NodeAdded, "/jcr:system/jcr:versionStorage"),
            ChangeEvent::new(EventKind::NodeAdded, "/content/tcs/page1"),
        ]);

        let err = BatchCollapser::default().collapse(&batch).unwrap_err();
        assert!(matches!(
            err,
            TriggerError::Normalize(NormalizeError::MetadataAtRoot(_))
        ));
    }
}
