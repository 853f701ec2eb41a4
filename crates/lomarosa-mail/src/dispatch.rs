//! Batch dispatch with bounded concurrency.
//!
//! One failed delivery never aborts the batch: every reminder produces a
//! per-recipient result and the summary is reported only once all sends
//! have settled.

use futures::stream::{self, StreamExt};
use lomarosa_core::record::Reminder;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
  error::SendFailure,
  message::render_reminder,
  transport::MailTransport,
};

/// Outcome for a single reminder, wire-named for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
  #[serde(rename = "destinatario")]
  pub recipient:      String,
  #[serde(rename = "numero_factura")]
  pub invoice_number: String,
  #[serde(rename = "nombre_tercero")]
  pub customer:       String,
  pub success:        bool,
  /// `null` on success, the failure message otherwise.
  pub error:          Option<String>,
}

/// Aggregate outcome of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
  pub total:   usize,
  #[serde(rename = "exitosos")]
  pub sent:    usize,
  #[serde(rename = "fallidos")]
  pub failed:  usize,
  #[serde(rename = "resultados")]
  pub results: Vec<DispatchResult>,
}

/// Send every reminder, at most `max_concurrent` in flight at a time.
///
/// Addresses without an `@` are rejected up front without touching the
/// transport. Waits for all sends to settle before returning.
pub async fn dispatch_all<M: MailTransport>(
  mailer: &M,
  reminders: &[Reminder],
  max_concurrent: usize,
) -> DispatchSummary {
  let concurrency = max_concurrent.max(1);

  // Fan out over owned reminders: an async block capturing a borrowed
  // `&Reminder` would pin the closure to one lifetime and fail the
  // higher-ranked bounds axum handlers need.
  let results: Vec<DispatchResult> = stream::iter(reminders.to_vec())
    .map(|reminder| async move {
      let outcome = send_one(mailer, &reminder).await;
      if let Err(failure) = &outcome {
        warn!(
          to = %reminder.email,
          invoice = %reminder.invoice_number,
          error = %failure,
          "reminder delivery failed"
        );
      }
      DispatchResult {
        success:        outcome.is_ok(),
        error:          outcome.err().map(|e| e.to_string()),
        recipient:      reminder.email,
        invoice_number: reminder.invoice_number,
        customer:       reminder.customer,
      }
    })
    .buffer_unordered(concurrency)
    .collect()
    .await;

  let sent = results.iter().filter(|r| r.success).count();
  let summary = DispatchSummary {
    total: results.len(),
    sent,
    failed: results.len() - sent,
    results,
  };

  info!(
    total = summary.total,
    sent = summary.sent,
    failed = summary.failed,
    "dispatch finished"
  );
  summary
}

async fn send_one<M: MailTransport>(
  mailer: &M,
  reminder: &Reminder,
) -> Result<(), SendFailure> {
  if !reminder.email.contains('@') {
    return Err(SendFailure::InvalidRecipient(reminder.email.clone()));
  }
  mailer.send(render_reminder(reminder)).await
}

#[cfg(test)]
mod tests {
  use std::{
    future::Future,
    sync::{
      Mutex,
      atomic::{AtomicUsize, Ordering},
    },
  };

  use lomarosa_core::classify::InvoiceStatus;

  use super::*;
  use crate::transport::OutgoingMail;

  /// In-memory transport: fails recipients listed in `failing`, records
  /// everything it was asked to send, and tracks peak concurrency.
  struct MockMailer {
    failing:  Vec<String>,
    sent:     Mutex<Vec<OutgoingMail>>,
    in_flight: AtomicUsize,
    peak:     AtomicUsize,
  }

  impl MockMailer {
    fn new(failing: &[&str]) -> Self {
      Self {
        failing:   failing.iter().map(|s| s.to_string()).collect(),
        sent:      Mutex::new(Vec::new()),
        in_flight: AtomicUsize::new(0),
        peak:      AtomicUsize::new(0),
      }
    }
  }

  impl MailTransport for MockMailer {
    fn is_configured(&self) -> bool {
      true
    }

    fn send(
      &self,
      mail: OutgoingMail,
    ) -> impl Future<Output = Result<(), SendFailure>> + Send + '_ {
      async move {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&mail.to) {
          return Err(SendFailure::Transport("rechazado".into()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
      }
    }
  }

  fn reminder(customer: &str, email: &str, invoice: &str) -> Reminder {
    Reminder {
      customer:       customer.into(),
      email:          email.into(),
      invoice_number: invoice.into(),
      issue_date:     None,
      due_date:       None,
      days_to_due:    -1,
      balance:        100.0,
      status:         InvoiceStatus::Vencido,
    }
  }

  #[tokio::test]
  async fn every_reminder_yields_a_result_even_on_failure() {
    let mailer = MockMailer::new(&["bad@x.com"]);
    let reminders = vec![
      reminder("Acme", "a@x.com", "F-1"),
      reminder("Beta", "bad@x.com", "F-2"),
      reminder("Gamma", "g@x.com", "F-3"),
    ];

    let summary = dispatch_all(&mailer, &reminders, 5).await;
    assert_eq!(summary.total, 3);
    assert_eq!(summary.sent, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.results.len(), 3);

    let failed = summary
      .results
      .iter()
      .find(|r| !r.success)
      .unwrap();
    assert_eq!(failed.invoice_number, "F-2");
    assert!(failed.error.is_some());
  }

  #[tokio::test]
  async fn addresses_without_at_never_reach_the_transport() {
    let mailer = MockMailer::new(&[]);
    let reminders = vec![reminder("Acme", "no-es-correo", "F-1")];

    let summary = dispatch_all(&mailer, &reminders, 5).await;
    assert_eq!(summary.failed, 1);
    assert!(mailer.sent.lock().unwrap().is_empty());
    assert!(
      summary.results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("destinatario inválido")
    );
  }

  #[tokio::test]
  async fn batches_dispatch_from_a_spawned_task() {
    // The batch future must stay self-contained (owned reminders, Send)
    // so callers generic over the transport, like the HTTP handlers, can
    // drive it.
    let summary = tokio::spawn(async {
      let mailer = MockMailer::new(&[]);
      let reminders = vec![
        reminder("Acme", "a@x.com", "F-1"),
        reminder("Beta", "b@x.com", "F-2"),
      ];
      dispatch_all(&mailer, &reminders, 2).await
    })
    .await
    .unwrap();

    assert_eq!(summary.sent, 2);
    assert_eq!(summary.failed, 0);
  }

  #[tokio::test]
  async fn in_flight_sends_never_exceed_the_bound() {
    let mailer = MockMailer::new(&[]);
    let reminders: Vec<Reminder> = (0..20)
      .map(|i| reminder("Acme", &format!("a{i}@x.com"), &format!("F-{i}")))
      .collect();

    let summary = dispatch_all(&mailer, &reminders, 3).await;
    assert_eq!(summary.sent, 20);
    assert!(mailer.peak.load(Ordering::SeqCst) <= 3);
  }

  #[tokio::test]
  async fn empty_batch_settles_immediately() {
    let mailer = MockMailer::new(&[]);
    let summary = dispatch_all(&mailer, &[], 5).await;
    assert_eq!(summary.total, 0);
    assert_eq!(summary.sent, 0);
  }

  #[tokio::test]
  async fn results_serialize_with_wire_names() {
    let mailer = MockMailer::new(&[]);
    let summary =
      dispatch_all(&mailer, &[reminder("Acme", "a@x.com", "F-1")], 1).await;

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["exitosos"], 1);
    assert_eq!(json["fallidos"], 0);
    assert_eq!(json["resultados"][0]["destinatario"], "a@x.com");
    assert_eq!(json["resultados"][0]["nombre_tercero"], "Acme");
  }
}
