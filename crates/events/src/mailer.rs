//! Email delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport to send the plain-text
//! emails the backend produces: address verification, password reset, and
//! owner notifications. Configuration is loaded from environment variables;
//! if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! mailer should be constructed -- email-dependent features then degrade to
//! log lines.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::bus::DomainEvent;

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@atelier.local";

/// Subject prefix for every outgoing email.
const SUBJECT_PREFIX: &str = "[Atelier]";

/// Ways an email can fail to leave the building.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The SMTP conversation failed: connection, authentication, refusal.
    #[error("SMTP failure: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender or recipient address would not parse.
    #[error("Bad email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message itself could not be assembled.
    #[error("Could not build message: {0}")]
    Build(String),
}

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Relay hostname; its presence is what turns email on.
    pub smtp_host: String,
    /// Relay port, STARTTLS assumed.
    pub smtp_port: u16,
    /// `From:` address on everything we send.
    pub from_address: String,
    /// Credentials, when the relay wants them.
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                 |
    /// |-----------------|----------|-------------------------|
    /// | `SMTP_HOST`     | yes      | --                      |
    /// | `SMTP_PORT`     | no       | `587`                   |
    /// | `SMTP_FROM`     | no       | `noreply@atelier.local` |
    /// | `SMTP_USER`     | no       | --                      |
    /// | `SMTP_PASSWORD` | no       | --                      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;

        let smtp_port = match std::env::var("SMTP_PORT") {
            Ok(raw) => raw.parse().unwrap_or(DEFAULT_SMTP_PORT),
            Err(_) => DEFAULT_SMTP_PORT,
        };

        Some(Self {
            smtp_host,
            smtp_port,
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends backend emails via SMTP.
///
/// The transport is built once and reused; `lettre` pools connections
/// internally. Cloning is cheap (the transport is reference-counted).
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    /// Build a mailer from the given configuration.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from_address: config.from_address.clone(),
        })
    }

    /// Send the email-verification message containing `link`.
    pub async fn send_verification_email(&self, to: &str, link: &str) -> Result<(), EmailError> {
        let body = format!(
            "Hello,\n\n\
             Confirm this email address for the Atelier admin backend by \
             opening the link below:\n\n\
             {link}\n\n\
             The link expires in 24 hours. If you did not request this, you \
             can ignore this message.\n"
        );
        self.send(to, "Verify your email address", body).await
    }

    /// Send the password-reset message containing `link`.
    pub async fn send_password_reset_email(&self, to: &str, link: &str) -> Result<(), EmailError> {
        let body = format!(
            "Hello,\n\n\
             A password reset was requested for your Atelier account. Open \
             the link below to choose a new password:\n\n\
             {link}\n\n\
             The link expires in 2 hours. If you did not request a reset, no \
             action is needed and your password is unchanged.\n"
        );
        self.send(to, "Reset your password", body).await
    }

    /// Send a notification email describing `event` to the site owner.
    pub async fn send_event_notification(
        &self,
        to: &str,
        event: &DomainEvent,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Event: {}\nTime: {}\nDetails: {}\n",
            event.name,
            event.occurred_at,
            serde_json::to_string_pretty(&event.payload).unwrap_or_default()
        );
        self.send(to, &event.name, body).await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(format!("{SUBJECT_PREFIX} {subject}"))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(email).await?;

        tracing::info!(to, subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_smtp_host_turns_email_off() {
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn build_failures_carry_their_reason() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Could not build message: missing body");
    }

    #[test]
    fn address_failures_are_distinguishable() {
        let parse: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(parse.unwrap_err());
        assert!(err.to_string().starts_with("Bad email address:"));
    }
}
