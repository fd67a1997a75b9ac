use std::sync::Arc;

use atelier_events::{EventBus, Mailer};

use crate::config::ServerConfig;

/// What every handler can reach through `State<AppState>`. Cloned per
/// request, so everything inside is an `Arc` or already cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: atelier_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Fan-out point for domain events; the notifier listens on the other end.
    pub event_bus: Arc<EventBus>,
    /// `None` when `SMTP_HOST` is unset. Flows that would send mail log a
    /// warning instead and otherwise behave the same.
    pub mailer: Option<Arc<Mailer>>,
}
