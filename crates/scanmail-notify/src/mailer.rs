// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SMTP notifier.
//
// One message per document, one connection per message: the transport is
// built without pooling, so each send connects, upgrades with STARTTLS,
// authenticates, delivers, and quits. Failures are returned to the caller
// unchanged; nothing is retried or queued.

use std::fmt::Display;
use std::path::Path;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use scanmail_core::EmailSettings;
use scanmail_core::error::{Result, ScanmailError};
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument};

/// MIME type of every attachment.
pub const ATTACHMENT_CONTENT_TYPE: &str = "application/pdf";

/// Something that can deliver a finished document.
pub trait DocumentSender {
    /// Deliver `document` as an attachment.
    fn send_document(&self, document: &Path) -> Result<()>;

    /// Where documents are delivered, for operator messages.
    fn recipient(&self) -> &str;
}

/// Build the message carrying `document` as its only part.
pub fn compose_message(settings: &EmailSettings, subject: &str, document: &Path) -> Result<Message> {
    let from = parse_mailbox(&settings.sender)?;
    let to = parse_mailbox(&settings.recipient)?;

    let filename = document
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ScanmailError::MessageBuild(format!("{} has no file name", document.display()))
        })?;
    let body = std::fs::read(document)?;
    debug!(filename = %filename, bytes = body.len(), "attaching document");

    let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
        .map_err(|e| ScanmailError::MessageBuild(e.to_string()))?;
    let attachment = Attachment::new(filename).body(body, content_type);

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(MultiPart::mixed().singlepart(attachment))
        .map_err(|e| ScanmailError::MessageBuild(e.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| ScanmailError::InvalidAddress {
            address: address.to_owned(),
            reason: e.to_string(),
        })
}

/// Sends documents through any `lettre` transport.
pub struct Notifier<T> {
    settings: EmailSettings,
    subject: String,
    transport: T,
}

impl Notifier<SmtpTransport> {
    /// Notifier delivering through the configured SMTP relay with STARTTLS.
    pub fn smtp(settings: EmailSettings, subject: impl Into<String>) -> Result<Self> {
        let credentials = Credentials::new(
            settings.smtp_username.clone(),
            settings.smtp_password.expose_secret().to_owned(),
        );
        let transport = SmtpTransport::starttls_relay(&settings.smtp_host)
            .map_err(|e| ScanmailError::Smtp(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(credentials)
            .build();
        debug!(
            host = %settings.smtp_host,
            port = settings.smtp_port,
            "SMTP transport prepared"
        );
        Ok(Self::with_transport(settings, subject, transport))
    }
}

impl<T> Notifier<T> {
    pub fn with_transport(settings: EmailSettings, subject: impl Into<String>, transport: T) -> Self {
        Self {
            settings,
            subject: subject.into(),
            transport,
        }
    }
}

impl<T> DocumentSender for Notifier<T>
where
    T: Transport,
    T::Error: Display,
{
    #[instrument(skip(self), fields(document = %document.display(), to = %self.settings.recipient))]
    fn send_document(&self, document: &Path) -> Result<()> {
        let message = compose_message(&self.settings, &self.subject, document)?;
        self.transport
            .send(&message)
            .map_err(|e| ScanmailError::Smtp(e.to_string()))?;
        info!("document emailed");
        Ok(())
    }

    fn recipient(&self) -> &str {
        &self.settings.recipient
    }
}
