//! Change events emitted by the content repository.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ObservationError;

/// A single raw change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The kind of change.
    pub kind: EventKind,

    /// Absolute, repository-rooted path of the affected node or property.
    pub path: String,

    /// When the change happened.
    pub timestamp: DateTime<Utc>,

    /// Who made the change.
    pub actor_id: String,

    /// Opaque identifier of the underlying change record.
    pub source_identifier: String,
}

impl ChangeEvent {
    /// Create a new change event stamped with the current time.
    pub fn new(kind: EventKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: Utc::now(),
            actor_id: String::new(),
            source_identifier: String::new(),
        }
    }

    /// Set the actor that made the change.
    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    /// Set the identifier of the underlying change record.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.source_identifier = identifier.into();
        self
    }

    /// Override the event time.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Kind of repository change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A node was added.
    NodeAdded,

    /// A node was moved.
    NodeMoved,

    /// A node was removed.
    NodeRemoved,

    /// A property was added.
    PropertyAdded,

    /// A property value changed.
    PropertyChanged,

    /// A property was removed.
    PropertyRemoved,
}

impl EventKind {
    /// Every kind the indexing listener subscribes to.
    pub const ALL: [EventKind; 6] = [
        EventKind::NodeAdded,
        EventKind::NodeMoved,
        EventKind::NodeRemoved,
        EventKind::PropertyAdded,
        EventKind::PropertyChanged,
        EventKind::PropertyRemoved,
    ];

    /// Label used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NodeAdded => "NODE_ADDED",
            Self::NodeMoved => "NODE_MOVED",
            Self::NodeRemoved => "NODE_REMOVED",
            Self::PropertyAdded => "PROPERTY_ADDED",
            Self::PropertyChanged => "PROPERTY_CHANGED",
            Self::PropertyRemoved => "PROPERTY_REMOVED",
        }
    }

    /// The repository's integer type code for this kind.
    pub const fn code(self) -> u32 {
        match self {
            Self::NodeAdded => 1,
            Self::NodeRemoved => 2,
            Self::PropertyAdded => 4,
            Self::PropertyRemoved => 8,
            Self::PropertyChanged => 16,
            Self::NodeMoved => 32,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u32> for EventKind {
    type Error = ObservationError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(ObservationError::UnknownEventKind(code))
    }
}

/// Events delivered together for one observation callback.
#[derive(Debug, Clone, Default)]
pub struct EventBatch {
    /// Events in delivery order.
    pub events: Vec<ChangeEvent>,

    /// When the batch was handed to the listener.
    pub delivered_at: Option<DateTime<Utc>>,
}

impl EventBatch {
    /// Create a batch from events, stamped with the current time.
    pub fn new(events: Vec<ChangeEvent>) -> Self {
        Self {
            events,
            delivered_at: Some(Utc::now()),
        }
    }

    /// Add an event to the batch.
    pub fn push(&mut self, event: ChangeEvent) {
        self.events.push(event);
    }

    /// The first event, if any.
    pub fn first(&self) -> Option<&ChangeEvent> {
        self.events.first()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Iterate over the events in delivery order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChangeEvent> {
        self.events.iter()
    }
}

impl FromIterator<ChangeEvent> for EventBatch {
    fn from_iter<I: IntoIterator<Item = ChangeEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EventBatch {
    type Item = &'a ChangeEvent;
    type IntoIter = std::slice::Iter<'a, ChangeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
