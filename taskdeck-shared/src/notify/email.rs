/// Email delivery over SMTP
///
/// [`EmailSender`] sends plain-text notification emails with lettre's async
/// SMTP transport. The server builds an [`EmailConfig`] only when `SMTP_HOST`
/// is configured; otherwise no sender exists and email is skipped.
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

use super::Notification;

/// Error type for email delivery
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const DEFAULT_FROM_ADDRESS: &str = "TaskDeck <noreply@taskdeck.local>";

/// SMTP settings
///
/// | Variable        | Required | Default                             |
/// |-----------------|----------|-------------------------------------|
/// | `SMTP_HOST`     | yes      |                                     |
/// | `SMTP_PORT`     | no       | `587`                               |
/// | `SMTP_FROM`     | no       | `TaskDeck <noreply@taskdeck.local>` |
/// | `SMTP_USER`     | no       |                                     |
/// | `SMTP_PASSWORD` | no       |                                     |
///
/// `SMTP_USER` and `SMTP_PASSWORD` are set together or not at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    #[serde(skip_serializing)]
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Checks that the sender address is a valid mailbox
    pub fn validate(&self) -> Result<(), EmailError> {
        self.from_address.parse::<Mailbox>()?;
        Ok(())
    }
}

/// Sends notification emails
pub struct EmailSender {
    config: EmailConfig,
}

impl EmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Builds the message for one recipient without sending it
    pub fn build_message(&self, to_email: &str, notification: &Notification) -> Result<Message, EmailError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(format!("[TaskDeck] {}", notification.title))
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    pub async fn send(&self, to_email: &str, notification: &Notification) -> Result<(), EmailError> {
        let email = self.build_message(to_email, notification)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(
            to = to_email,
            task_id = %notification.task_id,
            kind = notification.kind.as_str(),
            "Notification email sent"
        );
        Ok(())
    }
}
