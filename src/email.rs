// ABOUTME: Outgoing e-mail abstraction with an SMTP implementation
// ABOUTME: Sends estimate and contract PDFs to clients over STARTTLS
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # E-mail Delivery
//!
//! Routes depend on the [`Mailer`] trait so tests can capture messages
//! instead of talking to a relay. [`SmtpMailer`] is the production
//! implementation, built from [`SmtpConfig`] only when credentials are set.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::environment::SmtpConfig;
use crate::errors::{AppError, AppResult};

/// Service name used in error messages
const SMTP_SERVICE: &str = "SMTP";

/// A file attached to an e-mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    /// File name shown to the recipient
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl EmailAttachment {
    /// PDF attachment
    #[must_use]
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "application/pdf".to_owned(),
            bytes,
        }
    }
}

/// A message ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Optional attachment
    pub attachment: Option<EmailAttachment>,
}

/// Sends e-mail
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    ///
    /// # Errors
    ///
    /// Returns `EXTERNAL_SERVICE_ERROR` when delivery fails
    async fn send(&self, email: OutgoingEmail) -> AppResult<()>;
}

/// SMTP relay client using STARTTLS and login credentials
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build from configuration; `None` when credentials are absent
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` when the relay host or sender address is invalid
    pub fn from_config(config: &SmtpConfig) -> AppResult<Option<Self>> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            warn!("SMTP credentials not configured; e-mail routes are disabled");
            return Ok(None);
        };

        let sender = config.sender().unwrap_or(username);
        let from: Mailbox = sender
            .parse()
            .map_err(|e| AppError::config(format!("Invalid SMTP sender '{sender}': {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::config(format!("Invalid SMTP host {}: {e}", config.host)))?
            .port(config.port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build();

        info!(host = %config.host, port = config.port, "SMTP mailer configured");
        Ok(Some(Self { transport, from }))
    }

    fn build_message(&self, email: OutgoingEmail) -> AppResult<Message> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::invalid_format("to", format!("{e}")))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject);

        let message = match email.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                    AppError::internal(format!(
                        "Invalid attachment type {}: {e}",
                        attachment.content_type
                    ))
                })?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(email.body))
                        .singlepart(
                            Attachment::new(attachment.file_name)
                                .body(attachment.bytes, content_type),
                        ),
                )
            }
            None => builder.body(email.body),
        };

        message.map_err(|e| AppError::internal(format!("Failed to build e-mail: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::external_service(SMTP_SERVICE, e.to_string()))?;
        Ok(())
    }
}
