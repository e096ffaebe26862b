//! Notification email sender
//!
//! SMTP with a STARTTLS upgrade and login credentials from the resolved
//! secrets. Recipients are validated syntactically before any connection
//! is attempted. The credential is never logged.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::GatewayConfig;
use crate::error::{EmailError, Error};
use crate::secrets::{SecretName, Secrets};

/// Mail relay client.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl Mailer {
    /// Build a mailer for the configured relay, authenticating as the
    /// sender address with the mail password from the resolved secrets.
    pub fn new(config: &GatewayConfig, secrets: &Secrets) -> Result<Self, Error> {
        let credentials = Credentials::new(
            config.sender_email.clone(),
            secrets.get(SecretName::MailPassword)?.expose().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let sender = config
            .sender_email
            .parse::<Mailbox>()
            .map_err(|e| EmailError::Address(e.to_string()))?;

        Ok(Self { transport, sender })
    }

    /// Send a notification message.
    ///
    /// # Errors
    ///
    /// [`EmailError::InvalidRecipient`] when the recipient fails syntactic
    /// validation (no connection is attempted); [`EmailError::Transport`]
    /// for any relay or protocol fault.
    pub async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        if !recipient.contains('@') {
            return Err(EmailError::InvalidRecipient);
        }

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| EmailError::Address(e.to_string()))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| EmailError::Address(e.to_string()))?;

        self.transport.send(message).await.map_err(|e| {
            // SMTP errors carry response codes, never the credential.
            tracing::error!(error = %e, "email delivery failed");
            EmailError::Transport(e.to_string())
        })?;

        tracing::info!(recipient, "notification email sent");
        Ok(())
    }
}
