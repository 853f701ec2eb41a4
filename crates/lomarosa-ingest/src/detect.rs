//! Role detection for uploaded sources.
//!
//! Users upload two workbooks in either order; the column names decide
//! which one is the contact reference ("terceros") and which one carries
//! the open invoices ("cartera").

use lomarosa_core::Error;
use tracing::info;

use crate::table::Table;

/// The role a tabular source plays in the reminder pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
  /// Contact reference: names, emails, payment terms.
  Reference,
  /// Fact table: open invoices with balances and due info.
  Facts,
}

impl SourceRole {
  pub fn label(self) -> &'static str {
    match self {
      SourceRole::Reference => "terceros",
      SourceRole::Facts => "cartera",
    }
  }
}

/// Decide what a single table is, from its column names alone.
///
/// A reference table has a name column and an email column but no invoice
/// column. A facts table has an invoice column plus due-date, days and
/// balance columns. Anything else is unrecognized.
pub fn detect_role(table: &Table) -> Option<SourceRole> {
  let cols: Vec<String> =
    table.columns.iter().map(|c| c.trim().to_lowercase()).collect();

  let has = |tokens: &[&str]| {
    cols.iter().any(|c| tokens.iter().any(|t| c.contains(t)))
  };

  let has_name = has(&["nombre", "cliente", "tercero"]);
  let has_email = has(&["email", "correo", "mail"]);
  let has_invoice = has(&["factura", "fac", "numero", "documento"]);
  let has_due = has(&["vencimiento", "vence", "fecha"]);
  let has_days = has(&["dias", "días"]);
  let has_balance = has(&["saldo", "valor"]);

  if has_name && has_email && !has_invoice {
    Some(SourceRole::Reference)
  } else if has_invoice && has_due && has_days && has_balance {
    Some(SourceRole::Facts)
  } else {
    None
  }
}

/// Assign roles to the two uploads regardless of order.
///
/// Both tables must resolve to distinct roles; two references, two fact
/// tables, or an unrecognized pair is rejected so the caller never joins
/// the wrong way round.
pub fn assign_roles<'a>(
  first: &'a Table,
  second: &'a Table,
) -> Result<(&'a Table, &'a Table), Error> {
  let role_a = detect_role(first);
  let role_b = detect_role(second);

  info!(
    first = role_a.map(SourceRole::label).unwrap_or("desconocido"),
    second = role_b.map(SourceRole::label).unwrap_or("desconocido"),
    "detected upload roles"
  );

  match (role_a, role_b) {
    (Some(SourceRole::Reference), Some(SourceRole::Facts)) => {
      Ok((first, second))
    }
    (Some(SourceRole::Facts), Some(SourceRole::Reference)) => {
      Ok((second, first))
    }
    _ => Err(Error::AmbiguousSources {
      first:  role_a.map(SourceRole::label).unwrap_or("desconocido").into(),
      second: role_b.map(SourceRole::label).unwrap_or("desconocido").into(),
    }),
  }
}
