//! # Repository Observation
//!
//! This crate provides the repository-facing half of the content index
//! trigger. It models the change events a hierarchical content repository
//! emits and manages the listener subscription that receives them.
//!
//! ## Features
//!
//! - **Event Model**: Closed set of node/property change kinds
//! - **Collaborator Traits**: Repository, session and observation manager seams
//! - **In-Memory Source**: Event source for tests and local runs
//! - **Lifecycle**: Subscribe on activation, unsubscribe on shutdown
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Repository Observation                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ListenerConfig ──► ListenerLifecycle ──► ObservationManager    │
//! │       │                   │                      │              │
//! │       ▼                   ▼                      ▼              │
//! │  EventFilter          Session            EventListener(batch)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod memory;
pub mod repository;

pub use config::{DEFAULT_OBSERVED_PATH, EventFilter, ListenerConfig};
pub use error::{ObservationError, Result};
pub use event::{ChangeEvent, EventBatch, EventKind};
pub use lifecycle::{LifecycleState, ListenerLifecycle};
pub use memory::InMemoryRepository;
pub use repository::{EventListener, ListenerRegistration, ObservationManager, Repository, Session};
