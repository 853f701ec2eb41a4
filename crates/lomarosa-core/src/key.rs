//! Join-key normalization.
//!
//! Both subsystems join a facts table against a reference table on a loose
//! key: a customer/product name, or an alphanumeric code (NIT, product
//! code). Matching is only as good as the normalization, so all key
//! construction goes through this module.
//!
//! Blank input yields [`JoinKey::Empty`], a sentinel that never matches any
//! reference entry — the joiner checks for it explicitly. Without that
//! guard, two blank cells would silently join.

use serde::{Deserialize, Serialize};

/// A normalized join key.
///
/// Name keys are trimmed and case-folded. Code keys keep their original
/// casing (codes are treated as case-sensitive); only surrounding
/// whitespace and numeric `.0` artifacts are removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKey {
  /// Blank or missing input. Never matches anything, including itself —
  /// enforced by [`JoinKey::matchable`] checks in the joiner, not by `Eq`.
  Empty,
  /// A trimmed, lower-cased display name.
  Name(String),
  /// A trimmed code, original casing preserved.
  Code(String),
}

impl JoinKey {
  /// Normalize a name-based key: trim + lowercase.
  pub fn name(raw: &str) -> Self {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      JoinKey::Empty
    } else {
      JoinKey::Name(trimmed.to_lowercase())
    }
  }

  /// Normalize a code-based key: trim, preserve casing, strip a trailing
  /// `.0` left behind by numeric type inference (so a code read as the
  /// float `123.0` and one read as the text `"123"` produce the same key).
  pub fn code(raw: &str) -> Self {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return JoinKey::Empty;
    }
    JoinKey::Code(strip_float_artifact(trimmed).to_string())
  }

  /// Whether this key may participate in a join.
  pub fn matchable(&self) -> bool { !matches!(self, JoinKey::Empty) }
}

/// Strip a trailing `.0` (or `.00`, …) from an otherwise-integral numeric
/// string. Non-numeric input is returned unchanged.
fn strip_float_artifact(s: &str) -> &str {
  match s.split_once('.') {
    Some((head, tail))
      if !head.is_empty()
        && head.chars().all(|c| c.is_ascii_digit())
        && !tail.is_empty()
        && tail.chars().all(|c| c == '0') =>
    {
      head
    }
    _ => s,
  }
}

/// Render a numeric cell value as key/display text without the `.0`
/// artifact floats pick up from spreadsheet type inference.
pub fn number_to_text(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e15 {
    format!("{}", value as i64)
  } else {
    format!("{value}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_key_trims_and_folds_case() {
    assert_eq!(JoinKey::name("  Acme Corp "), JoinKey::name("ACME CORP"));
    assert_eq!(JoinKey::name("acme corp"), JoinKey::Name("acme corp".into()));
  }

  #[test]
  fn blank_name_is_empty_sentinel() {
    assert_eq!(JoinKey::name(""), JoinKey::Empty);
    assert_eq!(JoinKey::name("   "), JoinKey::Empty);
    assert!(!JoinKey::name("").matchable());
  }

  #[test]
  fn code_key_preserves_case() {
    assert_eq!(JoinKey::code("AbC-1"), JoinKey::Code("AbC-1".into()));
    assert_ne!(JoinKey::code("abc-1"), JoinKey::code("ABC-1"));
  }

  #[test]
  fn code_key_strips_float_artifact() {
    assert_eq!(JoinKey::code("900123.0"), JoinKey::code("900123"));
    assert_eq!(JoinKey::code("900123.00"), JoinKey::Code("900123".into()));
    // A real decimal is not an artifact.
    assert_eq!(JoinKey::code("12.5"), JoinKey::Code("12.5".into()));
    // Nor is a dotted alphanumeric code.
    assert_eq!(JoinKey::code("A.0"), JoinKey::Code("A.0".into()));
  }

  #[test]
  fn number_to_text_drops_trailing_zero() {
    assert_eq!(number_to_text(123.0), "123");
    assert_eq!(number_to_text(12.5), "12.5");
    assert_eq!(number_to_text(-4.0), "-4");
  }
}
