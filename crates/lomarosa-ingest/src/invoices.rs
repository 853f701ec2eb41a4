//! Invoice fact loading: the "cartera" side of the join.

use lomarosa_core::{
  columns::RequiredColumns,
  key::JoinKey,
  record::InvoiceRecord,
};
use tracing::info;

use crate::{Result, table::Table};

const CUSTOMER_ALIASES: &[&str] =
  &["nombre tercero", "tercero", "cliente", "nombre"];
const INVOICE_ALIASES: &[&str] = &[
  "numero fac",
  "número factura",
  "factura",
  "documento",
  "no. factura",
];
const BALANCE_ALIASES: &[&str] =
  &["saldo", "valor pendiente", "valor", "total"];
const DUE_ALIASES: &[&str] =
  &["fecha vencimiento", "vencimiento", "fecha vence", "vence"];
const ISSUE_ALIASES: &[&str] =
  &["fecha emision", "fecha emisión", "emision", "emisión", "fecha"];
const DAYS_ALIASES: &[&str] = &["dias vencimiento", "dias", "días"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceDiagnostics {
  pub total_rows: usize,
  pub loaded:     usize,
  pub blank_key:  usize,
}

/// Load invoice rows. Due date, issue date and the pre-computed days
/// column are all optional at this stage; the deriver later decides which
/// rows can actually be scheduled.
///
/// `days_fallback` substitutes for a days cell that exists but does not
/// parse, matching how the source reports render unreadable ages.
pub fn load_invoices(
  table: &Table,
  days_fallback: i64,
) -> Result<(Vec<InvoiceRecord>, InvoiceDiagnostics)> {
  let mut required = RequiredColumns::new(&table.columns);
  let customer_col = required.require("nombre tercero", CUSTOMER_ALIASES);
  let invoice_col = required.require("numero factura", INVOICE_ALIASES);
  let balance_col = required.require("saldo", BALANCE_ALIASES);
  let due_col = required.optional(DUE_ALIASES);
  let issue_col = required.optional(ISSUE_ALIASES);
  let days_col = required.optional(DAYS_ALIASES);
  required.finish()?;

  let customer_col = customer_col.expect("verified by finish");
  let invoice_col = invoice_col.expect("verified by finish");
  let balance_col = balance_col.expect("verified by finish");

  let mut invoices = Vec::new();
  let mut diag = InvoiceDiagnostics::default();

  for row in &table.rows {
    diag.total_rows += 1;

    let customer_raw = match table.cell(row, customer_col).as_text() {
      Some(c) => c,
      None => {
        diag.blank_key += 1;
        continue;
      }
    };

    let invoice_number = table
      .cell(row, invoice_col)
      .as_text()
      .unwrap_or_else(|| "N/A".to_string());

    let balance =
      table.cell(row, balance_col).as_number().unwrap_or(0.0);

    let due_date = due_col.and_then(|c| table.cell(row, c).as_date());
    let issue_date = issue_col.and_then(|c| table.cell(row, c).as_date());

    // A days cell that exists but is unreadable gets the sentinel
    // fallback; an absent column stays None so terms can fill it in.
    let days_to_due = days_col.map(|c| {
      let cell = table.cell(row, c);
      if cell.is_blank() {
        days_fallback
      } else {
        cell
          .as_number()
          .map(|n| n as i64)
          .unwrap_or(days_fallback)
      }
    });

    invoices.push(InvoiceRecord {
      customer_raw,
      invoice_number,
      issue_date,
      due_date,
      days_to_due,
      balance,
    });
  }

  diag.loaded = invoices.len();
  info!(
    total = diag.total_rows,
    loaded = diag.loaded,
    blank = diag.blank_key,
    "loaded invoice facts"
  );

  Ok((invoices, diag))
}

/// The join key an invoice row matches contacts under.
pub fn invoice_key(invoice: &InvoiceRecord) -> JoinKey {
  JoinKey::name(&invoice.customer_raw)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn table(csv: &str) -> Table {
    Table::from_csv_bytes(csv.as_bytes(), 0).unwrap()
  }

  #[test]
  fn loads_invoices_with_dates_and_days() {
    let t = table(
      "Nombre tercero,Numero fac,Vencimiento,Dias,Saldo\n\
       Acme Corp,F-001,2025-03-01,-2,1250000\n",
    );
    let (invoices, diag) = load_invoices(&t, 999).unwrap();
    assert_eq!(diag.loaded, 1);

    let inv = &invoices[0];
    assert_eq!(inv.invoice_number, "F-001");
    assert_eq!(inv.due_date, NaiveDate::from_ymd_opt(2025, 3, 1));
    assert_eq!(inv.days_to_due, Some(-2));
    assert_eq!(inv.balance, 1250000.0);
  }

  #[test]
  fn unreadable_days_cell_gets_the_fallback() {
    let t = table(
      "Tercero,Factura,Dias,Saldo\nAcme,F-1,no se,100\nBeta,F-2,,200\n",
    );
    let (invoices, _) = load_invoices(&t, 999).unwrap();
    assert_eq!(invoices[0].days_to_due, Some(999));
    assert_eq!(invoices[1].days_to_due, Some(999));
  }

  #[test]
  fn absent_days_column_leaves_days_unset() {
    let t = table("Tercero,Factura,Saldo\nAcme,F-1,100\n");
    let (invoices, _) = load_invoices(&t, 999).unwrap();
    assert_eq!(invoices[0].days_to_due, None);
  }

  #[test]
  fn blank_customers_are_skipped_and_counted() {
    let t = table("Tercero,Factura,Saldo\n,F-1,100\nAcme,F-2,50\n");
    let (invoices, diag) = load_invoices(&t, 999).unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(diag.blank_key, 1);
  }

  #[test]
  fn currency_formatted_balances_parse() {
    let t = table("Tercero,Factura,Saldo\nAcme,F-1,\"$ 1,250,000\"\n");
    let (invoices, _) = load_invoices(&t, 999).unwrap();
    assert_eq!(invoices[0].balance, 1250000.0);
  }

  #[test]
  fn missing_balance_column_is_reported() {
    let t = table("Tercero,Factura\nAcme,F-1\n");
    let err = load_invoices(&t, 999).unwrap_err();
    assert!(err.to_string().contains("saldo"));
  }
}
