//! Atelier event bus and email notification infrastructure.
//!
//! Building blocks for reacting to things that happen in the admin backend:
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] -- the canonical event envelope.
//! - [`Mailer`] -- SMTP delivery for verification, password reset, and
//!   notification emails (disabled when no SMTP host is configured).
//! - [`Notifier`] -- background subscriber that emails the site owner about
//!   noteworthy events.

pub mod bus;
pub mod mailer;
pub mod notifier;

pub use bus::{names, DomainEvent, EventBus};
pub use mailer::{EmailConfig, EmailError, Mailer};
pub use notifier::Notifier;
