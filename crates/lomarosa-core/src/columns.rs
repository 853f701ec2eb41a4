//! Column resolution — mapping loose spreadsheet headers to semantic fields.
//!
//! Real-world exports never agree on header names ("Nombre tercero",
//! "Tercero", "Cliente", …), so each canonical field carries an ordered
//! alias list. Resolution is exact-first, then substring, alias-by-alias in
//! the caller's priority order.

use crate::error::{Error, Result};

/// Find the column in `available` matching one of `aliases`.
///
/// Comparison is case-insensitive and whitespace-trimmed. Order:
/// 1. exact match against any alias;
/// 2. the first column whose lower-cased name *contains* an alias as a
///    substring, tried alias-by-alias.
///
/// Returns `None` (not an error) when nothing matches; callers aggregate
/// misses via [`RequiredColumns`].
pub fn resolve_column<'a>(
  available: &'a [String],
  aliases: &[&str],
) -> Option<&'a str> {
  let lowered: Vec<String> =
    available.iter().map(|c| c.trim().to_lowercase()).collect();

  // Pass 1: exact.
  for alias in aliases {
    let alias = alias.trim().to_lowercase();
    if let Some(idx) = lowered.iter().position(|c| *c == alias) {
      return Some(&available[idx]);
    }
  }

  // Pass 2: substring, in alias-priority order.
  for alias in aliases {
    let alias = alias.trim().to_lowercase();
    if let Some(idx) = lowered.iter().position(|c| c.contains(&alias)) {
      return Some(&available[idx]);
    }
  }

  None
}

/// Accumulates required-column lookups so that a single error can name
/// every missing field plus the full available-column list.
pub struct RequiredColumns<'a> {
  available: &'a [String],
  missing:   Vec<String>,
}

impl<'a> RequiredColumns<'a> {
  pub fn new(available: &'a [String]) -> Self {
    Self { available, missing: Vec::new() }
  }

  /// Resolve a required field; a miss is recorded under `canonical`.
  pub fn require(&mut self, canonical: &str, aliases: &[&str]) -> Option<&'a str> {
    let found = resolve_column(self.available, aliases);
    if found.is_none() {
      self.missing.push(canonical.to_string());
    }
    found
  }

  /// Resolve an optional field; a miss is not recorded.
  pub fn optional(&self, aliases: &[&str]) -> Option<&'a str> {
    resolve_column(self.available, aliases)
  }

  /// Fail with a single aggregate error if any required field was missing.
  pub fn finish(self) -> Result<()> {
    if self.missing.is_empty() {
      Ok(())
    } else {
      Err(Error::MissingColumns {
        missing:   self.missing,
        available: self.available.to_vec(),
      })
    }
  }
}
