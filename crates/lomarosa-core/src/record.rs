//! Record types flowing through the reconciliation pipeline.
//!
//! Wire-facing types keep the original Spanish field names via serde
//! renames so the JSON surface stays compatible with the existing frontend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::InvoiceStatus;

// ─── Reference side ──────────────────────────────────────────────────────────

/// One entry of the reference table: a customer/supplier contact.
///
/// Built once per load and held in an immutable map keyed by
/// [`crate::key::JoinKey`] for O(1) lookup during the join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
  /// The display form of the name, as it appeared in the sheet (trimmed).
  pub display_name: String,
  pub email:        String,
  /// Payment-term text ("contado", "30 días", …), when the sheet has it.
  pub terms:        Option<String>,
}

// ─── Facts side ──────────────────────────────────────────────────────────────

/// One accounts-receivable row, before joining against the contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
  /// Raw customer name as it appeared in the sheet; normalized at join
  /// time, never stored normalized.
  pub customer_raw:   String,
  pub invoice_number: String,
  pub issue_date:     Option<NaiveDate>,
  pub due_date:       Option<NaiveDate>,
  /// Days until due, when the export carries a precomputed column.
  /// Negative means overdue. `None` when absent or unparsable without a
  /// fallback; the deriver fills it from issue date + payment terms.
  pub days_to_due:    Option<i64>,
  pub balance:        f64,
}

/// One current-inventory row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
  pub code:     String,
  pub product:  String,
  pub quantity: f64,
  pub unit:     Option<String>,
}

// ─── Joined / derived ────────────────────────────────────────────────────────

/// A fully-joined, classified payment reminder — the unit the dispatcher
/// sends. Invariant: `email` is non-empty (an invoice without a contact is
/// dropped by the joiner, never propagated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
  #[serde(rename = "nombre_tercero")]
  pub customer:       String,
  pub email:          String,
  #[serde(rename = "numero_factura")]
  pub invoice_number: String,
  #[serde(rename = "fecha_emision")]
  pub issue_date:     Option<NaiveDate>,
  #[serde(rename = "fecha_vencimiento")]
  pub due_date:       Option<NaiveDate>,
  #[serde(rename = "dias")]
  pub days_to_due:    i64,
  #[serde(rename = "saldo")]
  pub balance:        f64,
  #[serde(rename = "estado")]
  pub status:         InvoiceStatus,
}

/// Format a balance the way the reminder emails and the frontend show it:
/// `$1,234,567`, no decimals.
pub fn format_currency(value: f64) -> String {
  let negative = value < 0.0;
  let whole = value.abs().round() as u64;
  let digits = whole.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  if negative {
    format!("-${grouped}")
  } else {
    format!("${grouped}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn currency_groups_thousands() {
    assert_eq!(format_currency(0.0), "$0");
    assert_eq!(format_currency(950.0), "$950");
    assert_eq!(format_currency(1000.0), "$1,000");
    assert_eq!(format_currency(1_234_567.4), "$1,234,567");
    assert_eq!(format_currency(-4500.0), "-$4,500");
  }

  #[test]
  fn reminder_serializes_with_spanish_field_names() {
    let r = Reminder {
      customer:       "Acme Corp".into(),
      email:          "a@x.com".into(),
      invoice_number: "F1".into(),
      issue_date:     None,
      due_date:       NaiveDate::from_ymd_opt(2025, 3, 1),
      days_to_due:    -2,
      balance:        1000.0,
      status:         InvoiceStatus::Vencido,
    };
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["nombre_tercero"], "Acme Corp");
    assert_eq!(json["numero_factura"], "F1");
    assert_eq!(json["dias"], -2);
    assert_eq!(json["estado"], "vencido");
    assert_eq!(json["fecha_vencimiento"], "2025-03-01");
  }
}
