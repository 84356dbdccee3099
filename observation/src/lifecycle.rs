//! Subscription lifecycle for the indexing listener.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::ListenerConfig;
use crate::error::Result;
use crate::repository::{
    EventListener, ListenerRegistration, ObservationManager, Repository, Session,
};

/// Whether the listener is currently subscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No session, no subscription.
    Inactive,

    /// Subscribed through an open session.
    Active,
}

struct ActiveSubscription {
    session: Box<dyn Session>,
    observation: Arc<dyn ObservationManager>,
    registration: Option<ListenerRegistration>,
}

/// Owns the repository session and the listener registration while active.
pub struct ListenerLifecycle {
    repository: Arc<dyn Repository>,
    listener: Arc<dyn EventListener>,
    config: ListenerConfig,
    active: Option<ActiveSubscription>,
}

impl ListenerLifecycle {
    /// Create an inactive lifecycle.
    pub fn new(
        repository: Arc<dyn Repository>,
        listener: Arc<dyn EventListener>,
        config: ListenerConfig,
    ) -> Self {
        Self {
            repository,
            listener,
            config,
            active: None,
        }
    }

    /// Open a privileged session and register the listener.
    ///
    /// On failure the error is logged and returned, and the lifecycle stays
    /// inactive with no session left open. Calling this while active does
    /// nothing.
    pub async fn activate(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Ok(());
        }

        info!(path = %self.config.observed_path, "activating listener for solr index management");

        let session = match self.repository.login_administrative().await {
            Ok(session) => session,
            Err(e) => {
                error!("failed to open repository session: {e}");
                return Err(e);
            }
        };

        let observation = session.observation_manager();
        let registration = match observation
            .add_event_listener(self.listener.clone(), self.config.filter())
            .await
        {
            Ok(registration) => registration,
            Err(e) => {
                error!(path = %self.config.observed_path, "failed to register listener: {e}");
                session.logout().await;
                return Err(e);
            }
        };

        debug!(
            user = session.user_id(),
            registration = registration.id(),
            recursive = self.config.recursive,
            "listener registered"
        );
        self.active = Some(ActiveSubscription {
            session,
            observation,
            registration: Some(registration),
        });

        info!(path = %self.config.observed_path, "observing node changes");
        Ok(())
    }

    /// Unregister the listener and close the session.
    ///
    /// Safe to call any number of times. In-flight deliveries are left to
    /// finish on their own.
    pub async fn deactivate(&mut self) {
        let Some(mut active) = self.active.take() else {
            debug!("listener already inactive");
            return;
        };

        if let Some(registration) = active.registration.take() {
            if let Err(e) = active.observation.remove_event_listener(registration).await {
                warn!("failed to unregister listener: {e}");
            }
        }

        active.session.logout().await;
        info!(path = %self.config.observed_path, "listener deactivated");
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        if self.active.is_some() {
            LifecycleState::Active
        } else {
            LifecycleState::Inactive
        }
    }

    /// Check if the listener is subscribed.
    pub fn is_active(&self) -> bool {
        self.state() == LifecycleState::Active
    }

    /// Root of the observed subtree.
    pub fn observed_path(&self) -> &str {
        &self.config.observed_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObservationError;
    use crate::event::{ChangeEvent, EventBatch, EventKind};
    use crate::memory::InMemoryRepository;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        batches: AtomicUsize,
    }

    #[async_trait]
    impl EventListener for Counting {
        async fn on_event(&self, _batch: EventBatch) {
            self.batches.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn build_lifecycle(repository: &InMemoryRepository, listener: Arc<Counting>) -> ListenerLifecycle {
        ListenerLifecycle::new(
            Arc::new(repository.clone()),
            listener,
            ListenerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_activate_registers_listener() {
        let repository = InMemoryRepository::new();
        let listener = Arc::new(Counting::default());
        let mut lifecycle = build_lifecycle(&repository, listener.clone());

        assert_eq!(lifecycle.state(), LifecycleState::Inactive);
        lifecycle.activate().await.unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Active);
        assert_eq!(repository.subscription_count().await, 1);

        repository
            .emit(vec![ChangeEvent::new(EventKind::NodeAdded, "/content/tcs/page")])
            .await;
        assert_eq!(listener.batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_activate_twice_keeps_one_registration() {
        let repository = InMemoryRepository::new();
        let mut lifecycle = build_lifecycle(&repository, Arc::new(Counting::default()));

        lifecycle.activate().await.unwrap();
        lifecycle.activate().await.unwrap();

        assert_eq!(repository.subscription_count().await, 1);
        assert_eq!(repository.open_session_count().await, 1);
    }

    #[tokio::test]
    async fn test_deactivate_is_idempotent() {
        let repository = InMemoryRepository::new();
        let listener = Arc::new(Counting::default());
        let mut lifecycle = build_lifecycle(&repository, listener.clone());

        lifecycle.activate().await.unwrap();
        lifecycle.deactivate().await;
        lifecycle.deactivate().await;

        assert!(!lifecycle.is_active());
        assert_eq!(repository.subscription_count().await, 0);
        assert_eq!(repository.open_session_count().await, 0);

        repository
            .emit(vec![ChangeEvent::new(EventKind::NodeAdded, "/content/tcs/page")])
            .await;
        assert_eq!(listener.batches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deactivate_without_activate() {
        let repository = InMemoryRepository::new();
        let mut lifecycle = build_lifecycle(&repository, Arc::new(Counting::default()));

        lifecycle.deactivate().await;
        assert_eq!(lifecycle.state(), LifecycleState::Inactive);
    }

    #[tokio::test]
    async fn test_activation_failure_stays_inactive() {
        let repository = InMemoryRepository::new();
        repository.fail_logins("repository offline").await;
        let mut lifecycle = build_lifecycle(&repository, Arc::new(Counting::default()));

        let err = lifecycle.activate().await.unwrap_err();

        assert!(matches!(err, ObservationError::LoginFailed(_)));
        assert!(!lifecycle.is_active());
        assert_eq!(repository.subscription_count().await, 0);
    }

    #[tokio::test]
    async fn test_registration_failure_closes_session() {
        let repository = InMemoryRepository::new();
        let mut lifecycle = ListenerLifecycle::new(
            Arc::new(repository.clone()),
            Arc::new(Counting::default()),
            ListenerConfig::new("content/relative"),
        );

        let err = lifecycle.activate().await.unwrap_err();

        assert!(matches!(err, ObservationError::Registration { .. }));
        assert!(!lifecycle.is_active());
        assert_eq!(repository.open_session_count().await, 0);
    }
}
