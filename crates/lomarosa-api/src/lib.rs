//! JSON HTTP API for the reminder pipeline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`lomarosa_mail::MailTransport`]. TLS and listener setup are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let router = lomarosa_api::api_router(AppState::new(mailer, mail, pipeline));
//! ```

pub mod error;
pub mod process;
pub mod send;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use lomarosa_core::PipelineConfig;
use lomarosa_mail::{MailConfig, MailTransport};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared handler state. Cheap to clone; everything is behind an `Arc`.
pub struct AppState<M> {
  pub mailer:   Arc<M>,
  pub mail:     Arc<MailConfig>,
  pub pipeline: Arc<PipelineConfig>,
}

impl<M> AppState<M> {
  pub fn new(mailer: M, mail: MailConfig, pipeline: PipelineConfig) -> Self {
    Self {
      mailer:   Arc::new(mailer),
      mail:     Arc::new(mail),
      pipeline: Arc::new(pipeline),
    }
  }
}

impl<M> Clone for AppState<M> {
  fn clone(&self) -> Self {
    Self {
      mailer:   Arc::clone(&self.mailer),
      mail:     Arc::clone(&self.mail),
      pipeline: Arc::clone(&self.pipeline),
    }
  }
}

/// Build a fully-materialised API router for `state`.
pub fn api_router<M>(state: AppState<M>) -> Router<()>
where
  M: MailTransport + 'static,
{
  Router::new()
    .route("/procesar-excel", post(process::handler::<M>))
    .route("/enviar-correos", post(send::send_batch::<M>))
    .route("/test-email", get(send::test_email::<M>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use std::{future::Future, sync::Mutex};

  use axum::{
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
  };
  use lomarosa_mail::{OutgoingMail, SendFailure};
  use serde_json::Value;
  use tower::ServiceExt;

  use super::*;

  struct MockMailer {
    configured: bool,
    failing:    Vec<String>,
    sent:       Mutex<Vec<OutgoingMail>>,
  }

  impl MockMailer {
    fn new() -> Self {
      Self { configured: true, failing: Vec::new(), sent: Mutex::new(Vec::new()) }
    }

    fn unconfigured() -> Self {
      Self { configured: false, ..Self::new() }
    }
  }

  impl MailTransport for MockMailer {
    fn is_configured(&self) -> bool {
      self.configured
    }

    fn send(
      &self,
      mail: OutgoingMail,
    ) -> impl Future<Output = Result<(), SendFailure>> + Send + '_ {
      async move {
        if self.failing.contains(&mail.to) {
          return Err(SendFailure::Transport("rechazado".into()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
      }
    }
  }

  fn router(mailer: MockMailer) -> Router<()> {
    api_router(AppState::new(
      mailer,
      MailConfig::default(),
      PipelineConfig::default(),
    ))
  }

  const BOUNDARY: &str = "x-test-boundary";

  fn multipart_body(file1: &str, file2: &str) -> (String, String) {
    let body = format!(
      "--{b}\r\n\
       Content-Disposition: form-data; name=\"file1\"; filename=\"a.csv\"\r\n\
       Content-Type: text/csv\r\n\r\n{file1}\r\n\
       --{b}\r\n\
       Content-Disposition: form-data; name=\"file2\"; filename=\"b.csv\"\r\n\
       Content-Type: text/csv\r\n\r\n{file2}\r\n\
       --{b}--\r\n",
      b = BOUNDARY,
    );
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
  }

  async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn procesar_excel_joins_and_classifies() {
    let terceros = "Nombre,Email\nAcme Corp,a@x.com\n";
    let cartera = "Nombre tercero,Numero fac,Vencimiento,Dias,Saldo\n\
                   ACME CORP,F-1,2025-03-08,-2,1000\n\
                   Otro Cliente,F-2,2025-03-20,10,500\n";
    let (content_type, body) = multipart_body(terceros, cartera);

    let response = router(MockMailer::new())
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/procesar-excel")
          .header(CONTENT_TYPE, content_type)
          .body(Body::from(body))
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["stats"]["total"], 1);
    assert_eq!(json["stats"]["vencidos"], 1);
    assert_eq!(json["stats"]["proximos"], 0);

    let reminder = &json["recordatorios"][0];
    assert_eq!(reminder["nombre_tercero"], "Acme Corp");
    assert_eq!(reminder["estado"], "vencido");
    assert_eq!(reminder["numero_factura"], "F-1");
  }

  #[tokio::test]
  async fn procesar_excel_accepts_files_in_either_order() {
    let terceros = "Nombre,Email\nAcme,a@x.com\n";
    let cartera =
      "Tercero,Factura,Vencimiento,Dias,Saldo\nAcme,F-1,2025-03-08,-2,10\n";
    // Facts first this time.
    let (content_type, body) = multipart_body(cartera, terceros);

    let response = router(MockMailer::new())
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/procesar-excel")
          .header(CONTENT_TYPE, content_type)
          .body(Body::from(body))
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["stats"]["total"], 1);
  }

  #[tokio::test]
  async fn procesar_excel_rejects_unrecognizable_uploads() {
    let (content_type, body) =
      multipart_body("a,b\n1,2\n", "c,d\n3,4\n");

    let response = router(MockMailer::new())
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/procesar-excel")
          .header(CONTENT_TYPE, content_type)
          .body(Body::from(body))
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
  }

  #[tokio::test]
  async fn enviar_correos_reports_per_recipient_results() {
    let mailer = MockMailer {
      failing: vec!["bad@x.com".into()],
      ..MockMailer::new()
    };
    let payload = serde_json::json!({
      "recordatorios": [
        {
          "nombre_tercero": "Acme", "email": "a@x.com",
          "numero_factura": "F-1", "fecha_emision": null,
          "fecha_vencimiento": "2025-03-08", "dias": -2,
          "saldo": 1000.0, "estado": "vencido"
        },
        {
          "nombre_tercero": "Beta", "email": "bad@x.com",
          "numero_factura": "F-2", "fecha_emision": null,
          "fecha_vencimiento": null, "dias": 2,
          "saldo": 500.0, "estado": "proximo"
        }
      ]
    });

    let response = router(mailer)
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/enviar-correos")
          .header(CONTENT_TYPE, "application/json")
          .body(Body::from(payload.to_string()))
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 2);
    assert_eq!(json["exitosos"], 1);
    assert_eq!(json["fallidos"], 1);
    assert_eq!(json["resultados"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn enviar_correos_rejects_an_empty_batch() {
    let response = router(MockMailer::new())
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/enviar-correos")
          .header(CONTENT_TYPE, "application/json")
          .body(Body::from(r#"{"recordatorios": []}"#))
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn enviar_correos_requires_credentials() {
    let payload = serde_json::json!({
      "recordatorios": [{
        "nombre_tercero": "Acme", "email": "a@x.com",
        "numero_factura": "F-1", "fecha_emision": null,
        "fecha_vencimiento": null, "dias": -2,
        "saldo": 1000.0, "estado": "vencido"
      }]
    });

    let response = router(MockMailer::unconfigured())
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/enviar-correos")
          .header(CONTENT_TYPE, "application/json")
          .body(Body::from(payload.to_string()))
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(
      json["message"]
        .as_str()
        .unwrap()
        .contains("Credenciales")
    );
  }

  #[tokio::test]
  async fn test_email_sends_to_the_configured_account() {
    let response = router(MockMailer::new())
      .oneshot(
        Request::builder()
          .method("GET")
          .uri("/test-email")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
  }
}
