//! `POST /procesar-excel` — the reminder pipeline end to end.
//!
//! Takes both workbooks in one multipart request (either order), detects
//! which is which, joins invoices against contacts and returns the
//! classified reminders plus run statistics. Nothing is sent from here;
//! delivery is a separate call so the user can review first.

use axum::{Json, extract::{Multipart, State}};
use chrono::{Local, NaiveDate};
use lomarosa_core::{
  PipelineConfig,
  classify::{InvoiceStatus, classify_invoice},
  derive::{ReminderWindow, TermTable, days_to_due, due_schedule},
  join::join,
  record::{ContactRecord, InvoiceRecord, Reminder},
};
use lomarosa_ingest::{Table, detect::assign_roles};
use lomarosa_mail::MailTransport;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::{AppState, error::ApiError};

/// Counters surfaced to the frontend alongside the reminder list.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RunStats {
  pub total:         usize,
  pub vencidos:      usize,
  pub proximos:      usize,
  /// Invoice rows whose customer had no email on file.
  pub sin_email:     usize,
  /// Matched invoices excluded because they are too far from due.
  pub fuera_ventana: usize,
  /// Invoice rows with a blank customer, or one not in the reference.
  pub sin_nombre:    usize,
  /// Rows where no due date could be established at all.
  pub sin_plazo:     usize,
}

#[instrument(skip_all)]
pub async fn handler<M: MailTransport>(
  State(state): State<AppState<M>>,
  mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
  let mut file1 = None;
  let mut file2 = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(e.to_string()))?
  {
    let name = field.name().unwrap_or_default().to_string();
    let bytes = field
      .bytes()
      .await
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    match name.as_str() {
      "file1" => file1 = Some(bytes),
      "file2" => file2 = Some(bytes),
      _ => {}
    }
  }

  let (Some(file1), Some(file2)) = (file1, file2) else {
    return Err(ApiError::BadRequest(
      "Faltan archivos. Debes enviar file1 y file2.".into(),
    ));
  };

  let table1 = Table::from_bytes(&file1, &Default::default(), 0)?;
  let table2 = Table::from_bytes(&file2, &Default::default(), 0)?;
  let (reference, facts) = assign_roles(&table1, &table2)?;

  let today = Local::now().date_naive();
  let (reminders, stats) =
    run_pipeline(reference, facts, &state.pipeline, today)?;

  info!(
    total = stats.total,
    vencidos = stats.vencidos,
    proximos = stats.proximos,
    "processed reminder run"
  );

  let empty = reminders.is_empty();
  let mut body = json!({
    "success": true,
    "recordatorios": reminders,
    "stats": stats,
  });
  if empty {
    body["message"] = json!(
      "No se encontraron facturas próximas a vencer o vencidas con email asignado."
    );
  }
  Ok(Json(body))
}

/// Pure pipeline core: load, join, derive, classify. Separated from the
/// handler so tests can pin `today`.
pub fn run_pipeline(
  reference: &Table,
  facts: &Table,
  config: &PipelineConfig,
  today: NaiveDate,
) -> Result<(Vec<Reminder>, RunStats), ApiError> {
  let (contacts, _contact_diag) =
    lomarosa_ingest::contacts::load_contacts(reference)?;
  let (invoices, invoice_diag) =
    lomarosa_ingest::invoices::load_invoices(facts, config.days_fallback)?;

  let terms = TermTable::from_config(config);
  let window = ReminderWindow { upper_bound: config.window_days };

  let (pairs, join_stats) = join(
    invoices,
    &contacts,
    lomarosa_ingest::invoices::invoice_key,
    |invoice, contact| (invoice, contact.clone()),
  );

  let mut stats = RunStats {
    sin_nombre: invoice_diag.blank_key
      + join_stats.blank_key
      + join_stats.unmatched,
    ..RunStats::default()
  };

  let mut reminders = Vec::new();
  for (invoice, contact) in pairs {
    if contact.email.is_empty() {
      stats.sin_email += 1;
      continue;
    }

    let Some(days) = resolve_days(&invoice, &contact, &terms, config, today)
    else {
      stats.sin_plazo += 1;
      continue;
    };

    let Some(status) = classify_invoice(days, &window) else {
      stats.fuera_ventana += 1;
      continue;
    };

    match status {
      InvoiceStatus::Vencido => stats.vencidos += 1,
      InvoiceStatus::Proximo => stats.proximos += 1,
    }

    reminders.push(Reminder {
      customer:       contact.display_name.clone(),
      email:          contact.email.clone(),
      invoice_number: invoice.invoice_number,
      issue_date:     invoice.issue_date,
      due_date:       invoice.due_date,
      days_to_due:    days,
      balance:        invoice.balance,
      status,
    });
  }

  stats.total = reminders.len();
  Ok((reminders, stats))
}

/// Days-to-due resolution precedence: the precomputed column, then the
/// due date, then issue date plus the contact's payment terms.
fn resolve_days(
  invoice: &InvoiceRecord,
  contact: &ContactRecord,
  terms: &TermTable,
  config: &PipelineConfig,
  today: NaiveDate,
) -> Option<i64> {
  if let Some(days) = invoice.days_to_due {
    return Some(days);
  }
  if let Some(due) = invoice.due_date {
    return Some(days_to_due(due, today));
  }
  let issue = invoice.issue_date?;
  let term_days = match contact.terms.as_deref() {
    Some(term) => terms.days_for(term)?,
    None => terms.default_days()?,
  };
  let schedule = due_schedule(issue, term_days, config.lead_days);
  Some(days_to_due(schedule.due_date, today))
}

#[cfg(test)]
mod tests {
  use lomarosa_core::key::JoinKey;

  use super::*;

  fn table(csv: &str) -> Table {
    Table::from_csv_bytes(csv.as_bytes(), 0).unwrap()
  }

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
  }

  #[test]
  fn matched_overdue_invoice_becomes_a_vencido_reminder() {
    let reference =
      table("Nombre,Email\nAcme Corp,a@x.com\n");
    let facts = table(
      "Nombre tercero,Numero fac,Vencimiento,Dias,Saldo\n\
       ACME CORP,F-1,2025-03-08,-2,1000\n\
       Otro Cliente,F-2,2025-03-20,10,500\n",
    );

    let (reminders, stats) =
      run_pipeline(&reference, &facts, &PipelineConfig::default(), today())
        .unwrap();

    assert_eq!(reminders.len(), 1);
    let r = &reminders[0];
    assert_eq!(r.customer, "Acme Corp");
    assert_eq!(r.status, InvoiceStatus::Vencido);
    assert_eq!(r.days_to_due, -2);

    assert_eq!(stats.total, 1);
    assert_eq!(stats.vencidos, 1);
    assert_eq!(stats.proximos, 0);
    assert_eq!(stats.sin_nombre, 1);
  }

  #[test]
  fn in_window_invoices_classify_as_proximo() {
    let reference = table("Nombre,Email\nAcme,a@x.com\n");
    let facts = table(
      "Tercero,Factura,Dias,Saldo\nAcme,F-1,4,100\nAcme,F-2,5,100\n",
    );

    let (reminders, stats) =
      run_pipeline(&reference, &facts, &PipelineConfig::default(), today())
        .unwrap();

    assert_eq!(stats.proximos, 1);
    assert_eq!(stats.fuera_ventana, 1);
    assert_eq!(reminders[0].invoice_number, "F-1");
  }

  #[test]
  fn contacts_without_email_are_counted_not_sent() {
    let reference = table("Nombre,Email\nAcme,\n");
    let facts = table("Tercero,Factura,Dias,Saldo\nAcme,F-1,-3,100\n");

    let (reminders, stats) =
      run_pipeline(&reference, &facts, &PipelineConfig::default(), today())
        .unwrap();

    assert!(reminders.is_empty());
    assert_eq!(stats.sin_email, 1);
  }

  #[test]
  fn due_date_fills_in_for_a_missing_days_column() {
    let reference = table("Nombre,Email\nAcme,a@x.com\n");
    let facts =
      table("Tercero,Factura,Vencimiento,Saldo\nAcme,F-1,2025-03-08,100\n");

    let (reminders, _) =
      run_pipeline(&reference, &facts, &PipelineConfig::default(), today())
        .unwrap();

    assert_eq!(reminders[0].days_to_due, -2);
    assert_eq!(reminders[0].status, InvoiceStatus::Vencido);
  }

  #[test]
  fn payment_terms_derive_the_due_date_as_a_last_resort() {
    let reference =
      table("Nombre,Email,Plazo\nAcme,a@x.com,30 días\n");
    // Issued 2025-02-10 on 30-day terms: due 2025-03-12, two days out.
    let facts = table(
      "Tercero,Factura,Fecha emision,Saldo\nAcme,F-1,2025-02-10,100\n",
    );

    let (reminders, _) =
      run_pipeline(&reference, &facts, &PipelineConfig::default(), today())
        .unwrap();

    assert_eq!(reminders[0].days_to_due, 2);
    assert_eq!(reminders[0].status, InvoiceStatus::Proximo);
  }

  #[test]
  fn unrecoverable_terms_are_dropped_and_counted() {
    let reference = table("Nombre,Email\nAcme,a@x.com\n");
    let facts =
      table("Tercero,Factura,Fecha emision,Saldo\nAcme,F-1,2025-02-10,100\n");

    let (reminders, stats) =
      run_pipeline(&reference, &facts, &PipelineConfig::default(), today())
        .unwrap();

    assert!(reminders.is_empty());
    assert_eq!(stats.sin_plazo, 1);
  }

  #[test]
  fn join_is_insensitive_to_case_and_padding() {
    let reference = table("Nombre,Email\n  ACME CORP  ,a@x.com\n");
    let facts = table("Tercero,Factura,Dias,Saldo\nacme corp,F-1,-1,9\n");

    let (reminders, _) =
      run_pipeline(&reference, &facts, &PipelineConfig::default(), today())
        .unwrap();

    assert_eq!(reminders.len(), 1);
    assert_eq!(
      JoinKey::name(&reminders[0].customer),
      JoinKey::name("acme corp")
    );
  }
}
