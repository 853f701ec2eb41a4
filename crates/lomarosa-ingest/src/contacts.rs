//! Contact reference loading: the "terceros" side of the join.

use std::collections::HashMap;

use lomarosa_core::{
  columns::RequiredColumns,
  key::JoinKey,
  record::ContactRecord,
};
use tracing::{debug, info};

use crate::{Result, table::Table};

const NAME_ALIASES: &[&str] = &["nombre", "cliente", "tercero", "razon social"];
const EMAIL_ALIASES: &[&str] = &["email", "correo", "mail", "e-mail"];
const TERMS_ALIASES: &[&str] =
  &["condicion de pago", "condición de pago", "plazo"];

/// Per-load counters, reported back to the caller for response stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactDiagnostics {
  pub total_rows:     usize,
  pub loaded:         usize,
  pub blank_key:      usize,
  pub missing_email:  usize,
  pub duplicate_keys: usize,
}

/// Build the contact reference map keyed by normalized name.
///
/// Rows without a usable name are dropped. Rows without an email are kept
/// (they still join; the dispatcher rejects them later) but counted. A
/// repeated key keeps the last row seen.
pub fn load_contacts(
  table: &Table,
) -> Result<(HashMap<JoinKey, ContactRecord>, ContactDiagnostics)> {
  let mut required = RequiredColumns::new(&table.columns);
  let name_col = required.require("nombre", NAME_ALIASES);
  let email_col = required.require("email", EMAIL_ALIASES);
  let terms_col = required.optional(TERMS_ALIASES);
  required.finish()?;

  let name_col = name_col.expect("verified by finish");
  let email_col = email_col.expect("verified by finish");

  let mut contacts = HashMap::new();
  let mut diag = ContactDiagnostics::default();

  for row in &table.rows {
    diag.total_rows += 1;

    let display_name = match table.cell(row, name_col).as_text() {
      Some(n) => n,
      None => {
        diag.blank_key += 1;
        continue;
      }
    };
    let key = JoinKey::name(&display_name);
    if !key.matchable() {
      diag.blank_key += 1;
      continue;
    }

    let email = table.cell(row, email_col).as_text().unwrap_or_default();
    if email.is_empty() {
      diag.missing_email += 1;
    }

    let terms = terms_col.and_then(|c| table.cell(row, c).as_text());

    if contacts
      .insert(key, ContactRecord { display_name: display_name.clone(), email, terms })
      .is_some()
    {
      diag.duplicate_keys += 1;
      debug!(name = %display_name, "duplicate contact key, keeping last row");
    }
  }

  diag.loaded = contacts.len();
  info!(
    total = diag.total_rows,
    loaded = diag.loaded,
    blank = diag.blank_key,
    sin_email = diag.missing_email,
    "loaded contact reference"
  );

  Ok((contacts, diag))
}
