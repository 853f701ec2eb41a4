//! Delivery endpoints: batch send and SMTP smoke test.

use axum::{Json, extract::State};
use lomarosa_core::record::Reminder;
use lomarosa_mail::{MailTransport, OutgoingMail, dispatch_all};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SendRequest {
  pub recordatorios: Vec<Reminder>,
}

/// `POST /enviar-correos` — deliver a reviewed batch of reminders.
///
/// Overall `success` means at least one email went out; per-recipient
/// outcomes live in `resultados`.
#[instrument(skip_all, fields(count = body.recordatorios.len()))]
pub async fn send_batch<M: MailTransport>(
  State(state): State<AppState<M>>,
  Json(body): Json<SendRequest>,
) -> Result<Json<Value>, ApiError> {
  if body.recordatorios.is_empty() {
    return Err(ApiError::BadRequest(
      "La lista de recordatorios está vacía o no es válida.".into(),
    ));
  }
  if !state.mailer.is_configured() {
    return Err(ApiError::Config(
      "Credenciales de correo no configuradas. Revisa la configuración."
        .into(),
    ));
  }

  let summary = dispatch_all(
    state.mailer.as_ref(),
    &body.recordatorios,
    state.mail.max_concurrent,
  )
  .await;

  let mut value = serde_json::to_value(&summary)
    .map_err(|e| ApiError::Internal(e.to_string()))?;
  value["success"] = json!(summary.sent > 0);
  Ok(Json(value))
}

/// `GET /test-email` — send a self-addressed message to verify SMTP config.
pub async fn test_email<M: MailTransport>(
  State(state): State<AppState<M>>,
) -> Result<Json<Value>, ApiError> {
  if !state.mailer.is_configured() {
    return Err(ApiError::BadRequest(
      "Credenciales de correo no configuradas".into(),
    ));
  }

  let recipient = state.mail.username.clone();
  let mail = OutgoingMail {
    to:        recipient.clone(),
    subject:   "Prueba de Configuración SMTP - Cartera Lomarosa".into(),
    text_body: "Configuración SMTP exitosa.\n\nSi estás leyendo este \
                correo, tu configuración SMTP funciona correctamente.\n\n\
                Sistema de Recordatorios de Pago - Cartera Lomarosa"
      .into(),
    html_body: "<html><body style=\"font-family: Arial, sans-serif;\">\
                <h2>Configuración SMTP Exitosa</h2>\
                <p>Si estás leyendo este correo, tu configuración SMTP \
                funciona correctamente.</p><hr/>\
                <p>Sistema de Recordatorios de Pago - Cartera Lomarosa</p>\
                </body></html>"
      .into(),
  };

  state
    .mailer
    .send(mail)
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

  Ok(Json(json!({
    "success": true,
    "message": format!("Correo de prueba enviado exitosamente a {recipient}"),
    "detalles": {
      "servidor": state.mail.host,
      "puerto": state.mail.port,
      "usuario": state.mail.username,
      "destinatario": recipient,
    },
  })))
}
