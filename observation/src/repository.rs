//! Collaborator traits for the content repository's observation subsystem.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EventFilter;
use crate::error::Result;
use crate::event::EventBatch;

/// Receives batches of change events from an observation manager.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Handle one delivered batch. Must not panic on bad input.
    async fn on_event(&self, batch: EventBatch);
}

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerRegistration(u64);

impl ListenerRegistration {
    /// Wrap a raw registration id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw registration id.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Registers and unregisters event listeners.
#[async_trait]
pub trait ObservationManager: Send + Sync {
    /// Register `listener` for events passing `filter`.
    async fn add_event_listener(
        &self,
        listener: Arc<dyn EventListener>,
        filter: EventFilter,
    ) -> Result<ListenerRegistration>;

    /// Unregister a listener. In-flight deliveries are not waited for.
    async fn remove_event_listener(&self, registration: ListenerRegistration) -> Result<()>;
}

/// An open repository session.
#[async_trait]
pub trait Session: Send + Sync {
    /// The user the session is bound to.
    fn user_id(&self) -> &str;

    /// The session's observation manager.
    fn observation_manager(&self) -> Arc<dyn ObservationManager>;

    /// Close the session. Listeners registered through it stop receiving events.
    async fn logout(&self);
}

/// A content repository that hands out sessions.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Open a session with administrative privileges.
    async fn login_administrative(&self) -> Result<Box<dyn Session>>;
}
