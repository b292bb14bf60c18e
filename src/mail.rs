use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to send mail: {0}")]
pub struct MailError(pub String);

/// Delivers notification emails.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    fn sender(&self) -> &str;

    async fn deliver(&self, mail: OutgoingMail) -> Result<(), MailError>;

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        self.deliver(OutgoingMail {
            from: self.sender().to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        })
        .await
    }
}

/// Writes each message to the log instead of delivering it.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn sender(&self) -> &str {
        &self.from
    }

    async fn deliver(&self, mail: OutgoingMail) -> Result<(), MailError> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "Outgoing mail:\n{}",
            mail.body
        );
        Ok(())
    }
}

/// Keeps sent messages in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    from: String,
    outbox: Arc<Mutex<Vec<OutgoingMail>>>,
}

impl MemoryMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            outbox: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    pub fn last_to(&self, to: &str) -> Option<OutgoingMail> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    fn sender(&self) -> &str {
        &self.from
    }

    async fn deliver(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.outbox
            .lock()
            .map_err(|e| MailError(e.to_string()))?
            .push(mail);
        Ok(())
    }
}
