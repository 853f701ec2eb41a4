//! The `MailTransport` trait and its SMTP implementation.

use std::{future::Future, time::Duration};

use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::{Mailbox, MultiPart},
  transport::smtp::authentication::Credentials,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::SendFailure;

/// SMTP connection settings, deserialized from the server config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
  pub host:           String,
  pub port:           u16,
  pub username:       String,
  pub password:       String,
  pub from_name:      String,
  pub from_address:   String,
  /// Upper bound on in-flight deliveries during a batch dispatch.
  pub max_concurrent: usize,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self {
      host:           "smtp.gmail.com".into(),
      port:           587,
      username:       String::new(),
      password:       String::new(),
      from_name:      "Lomarosa".into(),
      from_address:   String::new(),
      max_concurrent: 5,
    }
  }
}

impl MailConfig {
  /// Whether enough is set to attempt delivery at all.
  pub fn has_credentials(&self) -> bool {
    !self.username.is_empty() && !self.password.is_empty()
  }
}

/// A fully-rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
  pub to:        String,
  pub subject:   String,
  pub text_body: String,
  pub html_body: String,
}

/// Abstraction over the delivery backend.
///
/// Methods return `Send` futures so dispatch can fan out on a
/// multi-threaded runtime; tests substitute an in-memory implementation.
pub trait MailTransport: Send + Sync {
  /// Whether this transport can plausibly deliver (credentials present).
  fn is_configured(&self) -> bool;

  /// Deliver one message. Failures are per-message and never abort a
  /// batch.
  fn send(
    &self,
    mail: OutgoingMail,
  ) -> impl Future<Output = Result<(), SendFailure>> + Send + '_;
}

// ─── SMTP implementation ─────────────────────────────────────────────────────

/// Real SMTP delivery via lettre, STARTTLS on the configured port.
pub struct SmtpMailer {
  transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
  from:      Option<Mailbox>,
}

impl SmtpMailer {
  /// Build from config. Missing credentials yield an unconfigured mailer
  /// rather than an error, so the server can still start and report the
  /// problem per request.
  pub fn new(config: &MailConfig) -> Result<Self, SendFailure> {
    if !config.has_credentials() {
      return Ok(Self { transport: None, from: None });
    }

    let transport =
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        .map_err(|e| SendFailure::from_smtp(&e))?
        .port(config.port)
        .credentials(Credentials::new(
          config.username.clone(),
          config.password.clone(),
        ))
        .timeout(Some(Duration::from_secs(30)))
        .build();

    let from_address = if config.from_address.is_empty() {
      &config.username
    } else {
      &config.from_address
    };
    let from = format!("{} <{}>", config.from_name, from_address)
      .parse::<Mailbox>()
      .map_err(|e| SendFailure::Unexpected(e.to_string()))?;

    Ok(Self { transport: Some(transport), from: Some(from) })
  }
}

impl MailTransport for SmtpMailer {
  fn is_configured(&self) -> bool {
    self.transport.is_some()
  }

  #[instrument(skip(self, mail), fields(to = %mail.to))]
  async fn send(&self, mail: OutgoingMail) -> Result<(), SendFailure> {
    let (Some(transport), Some(from)) = (&self.transport, &self.from)
    else {
      return Err(SendFailure::NotConfigured);
    };

    let to: Mailbox = mail
      .to
      .parse()
      .map_err(|_| SendFailure::InvalidRecipient(mail.to.clone()))?;

    let message = Message::builder()
      .from(from.clone())
      .to(to)
      .subject(mail.subject.clone())
      .multipart(MultiPart::alternative_plain_html(
        mail.text_body,
        mail.html_body,
      ))
      .map_err(|e| SendFailure::Unexpected(e.to_string()))?;

    transport
      .send(message)
      .await
      .map_err(|e| SendFailure::from_smtp(&e))?;

    debug!("delivered");
    Ok(())
  }
}
