//! Broadcast channel plumbing for domain events.
//!
//! One [`EventBus`] lives in the application state behind an `Arc`.
//! Handlers call [`EventBus::publish`] after a state change; the notifier
//! (and any future subscriber) holds a receiver. Publishing never blocks
//! and never fails -- with no subscribers the event just evaporates, which
//! is fine because the activity log, not the bus, is the durable record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use atelier_core::types::DbId;

/// Canonical dot-separated event names.
///
/// Handlers publish these; subscribers match on them. Keeping them as
/// constants avoids stringly-typed drift between publisher and subscriber.
pub mod names {
    pub const PIECE_CREATED: &str = "piece.created";
    pub const PIECE_UPDATED: &str = "piece.updated";
    pub const PIECE_PUBLISHED: &str = "piece.published";
    pub const PIECE_UNPUBLISHED: &str = "piece.unpublished";
    pub const PIECE_ARCHIVED: &str = "piece.archived";
    pub const PIECE_TRASHED: &str = "piece.trashed";
    pub const PIECE_RESTORED: &str = "piece.restored";
    pub const PIECE_PURGED: &str = "piece.purged";
    pub const AUTH_LOCKOUT: &str = "auth.lockout";
    pub const USER_CREATED: &str = "user.created";
}

/// Something that happened in the backend, ready for fan-out.
///
/// Built with [`DomainEvent::new`] plus the chainable
/// [`with_entity`](DomainEvent::with_entity),
/// [`by_user`](DomainEvent::by_user), and
/// [`with_payload`](DomainEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name from [`names`], e.g. `"piece.published"`.
    pub name: String,

    /// Kind of the entity the event is about (e.g. `"art_piece"`).
    pub entity_type: Option<String>,

    /// Database id of the entity the event is about.
    pub entity_id: Option<DbId>,

    /// Id of the user whose action produced the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON with whatever the subscriber might want to show.
    pub payload: serde_json::Value,

    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: None,
            entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    /// Attach the entity the event is about.
    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    /// Attach the acting user.
    pub fn by_user(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Buffer size of the underlying channel. A receiver more than this many
/// events behind sees `RecvError::Lagged` and skips ahead.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out hub: every subscriber gets its own copy of every event
/// published after it subscribed.
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Hand an event to whoever is listening. Zero listeners is not an
    /// error; the event is dropped.
    pub fn publish(&self, event: DomainEvent) {
        // send() errs only when there are no receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
