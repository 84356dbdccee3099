//! In-memory repository that acts as an event source.
//!
//! Nothing is stored besides sessions and listener registrations. Callers
//! push raw change events through [`InMemoryRepository::emit`], which
//! delivers them to every matching listener the way the repository's
//! observation subsystem would.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::config::EventFilter;
use crate::error::{ObservationError, Result};
use crate::event::{ChangeEvent, EventBatch};
use crate::repository::{
    EventListener, ListenerRegistration, ObservationManager, Repository, Session,
};

const ADMIN_USER: &str = "admin";

struct Subscription {
    registration: ListenerRegistration,
    session_id: u64,
    filter: EventFilter,
    listener: Arc<dyn EventListener>,
}

#[derive(Default)]
struct Shared {
    subscriptions: RwLock<Vec<Subscription>>,
    open_sessions: RwLock<HashSet<u64>>,
    login_failure: RwLock<Option<String>>,
    next_id: AtomicU64,
}

impl Shared {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A repository whose only content is the events pushed into it.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    shared: Arc<Shared>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following login fail with `reason`.
    pub async fn fail_logins(&self, reason: impl Into<String>) {
        *self.shared.login_failure.write().await = Some(reason.into());
    }

    /// Let logins succeed again.
    pub async fn allow_logins(&self) {
        *self.shared.login_failure.write().await = None;
    }

    /// Deliver one burst of events.
    ///
    /// Each subscription receives the events passing its filter as one batch,
    /// in registration order. Subscriptions with no matching event get
    /// nothing. Returns the number of batches delivered.
    pub async fn emit(&self, events: Vec<ChangeEvent>) -> usize {
        let targets: Vec<(EventFilter, Arc<dyn EventListener>)> = {
            let subscriptions = self.shared.subscriptions.read().await;
            subscriptions
                .iter()
                .map(|s| (s.filter.clone(), s.listener.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (filter, listener) in targets {
            let batch: EventBatch = events
                .iter()
                .filter(|event| filter.matches(event))
                .cloned()
                .collect();

            if batch.is_empty() {
                trace!(path = %filter.path, "no matching events for subscription");
                continue;
            }

            listener.on_event(batch).await;
            delivered += 1;
        }

        delivered
    }

    /// Number of registered listeners.
    pub async fn subscription_count(&self) -> usize {
        self.shared.subscriptions.read().await.len()
    }

    /// Number of sessions not yet logged out.
    pub async fn open_session_count(&self) -> usize {
        self.shared.open_sessions.read().await.len()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn login_administrative(&self) -> Result<Box<dyn Session>> {
        if let Some(reason) = self.shared.login_failure.read().await.clone() {
            return Err(ObservationError::LoginFailed(reason));
        }

        let id = self.shared.next_id();
        self.shared.open_sessions.write().await.insert(id);
        debug!(session = id, "opened administrative session");

        Ok(Box::new(MemorySession {
            id,
            shared: self.shared.clone(),
        }))
    }
}

struct MemorySession {
    id: u64,
    shared: Arc<Shared>,
}

#[async_trait]
impl Session for MemorySession {
    fn user_id(&self) -> &str {
        ADMIN_USER
    }

    fn observation_manager(&self) -> Arc<dyn ObservationManager> {
        Arc::new(MemoryObservationManager {
            session_id: self.id,
            shared: self.shared.clone(),
        })
    }

    async fn logout(&self) {
        // Lock order: subscriptions, then open_sessions.
        let mut subscriptions = self.shared.subscriptions.write().await;
        if self.shared.open_sessions.write().await.remove(&self.id) {
            subscriptions.retain(|s| s.session_id != self.id);
            debug!(session = self.id, "session logged out");
        }
    }
}

struct MemoryObservationManager {
    session_id: u64,
    shared: Arc<Shared>,
}

#[async_trait]
impl ObservationManager for MemoryObservationManager {
    async fn add_event_listener(
        &self,
        listener: Arc<dyn EventListener>,
        filter: EventFilter,
    ) -> Result<ListenerRegistration> {
        if !filter.path.starts_with('/') {
            return Err(ObservationError::Registration {
                path: filter.path,
                reason: "path must be absolute".to_string(),
            });
        }

        // Hold the subscription lock across the session check so a
        // concurrent logout cannot slip in between.
        let mut subscriptions = self.shared.subscriptions.write().await;
        if !self.shared.open_sessions.read().await.contains(&self.session_id) {
            return Err(ObservationError::Session(format!(
                "session {} is closed",
                self.session_id
            )));
        }

        let registration = ListenerRegistration::new(self.shared.next_id());
        subscriptions.push(Subscription {
            registration,
            session_id: self.session_id,
            filter,
            listener,
        });

        Ok(registration)
    }

    async fn remove_event_listener(&self, registration: ListenerRegistration) -> Result<()> {
        let mut subscriptions = self.shared.subscriptions.write().await;
        let before = subscriptions.len();
        subscriptions.retain(|s| s.registration != registration);

        if subscriptions.len() == before {
            return Err(ObservationError::UnknownRegistration(registration.id()));
        }
        Ok(())
    }
}
