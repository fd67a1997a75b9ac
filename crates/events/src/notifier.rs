//! Owner notification service.
//!
//! [`Notifier`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! emails the configured owner address about events worth a human look. It
//! runs as a long-lived background task and shuts down when the bus sender
//! is dropped.

use tokio::sync::broadcast;

use crate::bus::{names, DomainEvent};
use crate::mailer::Mailer;

/// Background service that emails the site owner about notable events.
pub struct Notifier;

impl Notifier {
    /// Run the notification loop.
    ///
    /// Receives every event published on the bus and forwards the ones
    /// [`should_notify`](Self::should_notify) selects to `notify_to`. The
    /// loop exits when the channel is closed (i.e. the bus is dropped).
    pub async fn run(
        mut receiver: broadcast::Receiver<DomainEvent>,
        mailer: Mailer,
        notify_to: String,
    ) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if !Self::should_notify(&event) {
                        continue;
                    }
                    if let Err(e) = mailer.send_event_notification(&notify_to, &event).await {
                        tracing::error!(
                            error = %e,
                            event = %event.name,
                            "Failed to send notification email"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notifier lagged, some events were not emailed");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Whether an event warrants an owner email.
    ///
    /// Publications and lockouts are the two things the owner wants to hear
    /// about promptly; routine edits stay in the activity log.
    pub fn should_notify(event: &DomainEvent) -> bool {
        matches!(event.name.as_str(), names::PIECE_PUBLISHED | names::AUTH_LOCKOUT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
