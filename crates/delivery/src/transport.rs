//! Mail transport abstraction and implementations.
//!
//! The dispatcher owns no transport state; it is handed an
//! `Arc<dyn MailTransport>` at construction and the process bootstrap owns
//! the lifecycle. The session is validated lazily via `probe` on first use
//! (once per batch), not at process start.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mailcast_core::config::SmtpConfig;
use mailcast_core::error::MailcastError;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// One fully addressed outbound message, body already instrumented.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html_body: String,
}

/// Contract the dispatch core requires from a mail transport.
///
/// `send` failures are per-recipient and never abort a batch; a `probe`
/// failure means the whole batch cannot proceed.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Validate that a transport session can be established. Errors map to
    /// `MailcastError::TransportUnavailable`.
    async fn probe(&self) -> Result<(), MailcastError>;

    /// Deliver a single message. Errors map to `MailcastError::Transport`.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailcastError>;
}

// ─── SMTP (lettre) ──────────────────────────────────────────────────────────

/// SMTP relay transport backed by lettre.
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailcastError> {
        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailcastError::Config(format!("SMTP relay setup: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        info!(host = %config.host, port = config.port, "SMTP transport configured");
        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
        })
    }

    fn build_message(email: &OutboundEmail) -> Result<Message, MailcastError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|_| MailcastError::Transport(format!("invalid sender address: {}", email.from)))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailcastError::Transport(format!("invalid recipient address: {}", email.to)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| MailcastError::Transport(format!("message build: {e}")))
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn probe(&self) -> Result<(), MailcastError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailcastError::TransportUnavailable(format!(
                "SMTP server {} rejected NOOP",
                self.host
            ))),
            Err(e) => Err(MailcastError::TransportUnavailable(format!(
                "SMTP connection to {} failed: {e}",
                self.host
            ))),
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailcastError> {
        let message = Self::build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailcastError::Transport(e.to_string()))?;
        debug!(to = %email.to, "SMTP message accepted");
        Ok(())
    }
}

// ─── Dry-run ────────────────────────────────────────────────────────────────

/// Logs every send without touching the network. Used by `--dry-run`.
pub struct DryRunTransport;

#[async_trait]
impl MailTransport for DryRunTransport {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn probe(&self) -> Result<(), MailcastError> {
        Ok(())
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailcastError> {
        info!(to = %email.to, subject = %email.subject, "dry-run: message not sent");
        Ok(())
    }
}

// ─── In-memory (tests) ──────────────────────────────────────────────────────

/// Records sent messages in memory; individual addresses and the probe can
/// be made to fail.
#[derive(Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: HashSet<String>,
    fail_probe: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to these addresses fail with a per-recipient transport error.
    pub fn failing<I: IntoIterator<Item = S>, S: Into<String>>(addresses: I) -> Self {
        Self {
            failing: addresses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A transport whose session cannot be established at all.
    pub fn unavailable() -> Self {
        Self {
            fail_probe: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn probe(&self) -> Result<(), MailcastError> {
        if self.fail_probe {
            Err(MailcastError::TransportUnavailable(
                "memory transport configured unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailcastError> {
        if self.failing.contains(&email.to) {
            return Err(MailcastError::Transport(format!(
                "mailbox unavailable for {}",
                email.to
            )));
        }
        self.sent.lock().expect("sent lock").push(email.clone());
        Ok(())
    }
}
