//! Delivery failure taxonomy.

use thiserror::Error;

/// Why a single reminder could not be delivered.
///
/// Messages are user-facing (they flow into the per-recipient `error`
/// field of the dispatch response), hence the Spanish wording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendFailure {
  #[error("credenciales SMTP no configuradas")]
  NotConfigured,
  #[error("autenticación SMTP rechazada, revise usuario y contraseña")]
  Auth,
  #[error("destinatario inválido: {0}")]
  InvalidRecipient(String),
  #[error("error de transporte SMTP: {0}")]
  Transport(String),
  #[error("{0}")]
  Unexpected(String),
}

impl SendFailure {
  /// Classify a lettre SMTP error. The lettre error type does not expose
  /// a stable discriminant for authentication failures, so we sniff the
  /// rendered message.
  pub fn from_smtp(err: &lettre::transport::smtp::Error) -> Self {
    let msg = err.to_string();
    let lowered = msg.to_lowercase();
    if lowered.contains("auth") || lowered.contains("credential") {
      SendFailure::Auth
    } else {
      SendFailure::Transport(msg)
    }
  }
}
