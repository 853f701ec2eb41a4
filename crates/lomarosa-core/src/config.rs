//! Pipeline configuration shared by both subsystems.
//!
//! Every policy knob the reconciliation engine exposes lives here so that
//! nothing is hardcoded in the pipeline itself. The server deserialises
//! this from `config.toml` / `LOMAROSA_*` environment variables; tests
//! construct it directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Tunable policy for derivation and classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Upper bound of the reminder window: an invoice is eligible iff
  /// `days_to_due < window_days`. Captures both near-due and overdue rows.
  pub window_days: i64,

  /// Days before the due date at which the reminder date falls.
  pub lead_days: i64,

  /// Fallback when a day-count cell cannot be parsed. Must mean "far in
  /// the future" so a bad cell is excluded rather than flagged urgent.
  pub days_fallback: i64,

  /// Days assigned to a payment-term string the term table does not know.
  /// `None` means the record is dropped (and counted) instead.
  pub default_term_days: Option<i64>,

  /// Extra or overriding payment-term → days entries, merged over the
  /// built-in table.
  pub terms: HashMap<String, i64>,

  /// Absolute-kg threshold below which (inclusive) stock is "Crítico".
  pub stock_critical_kg: f64,

  /// Absolute-kg threshold below which (inclusive) stock is "Bajo".
  pub stock_low_kg: f64,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      window_days:       5,
      lead_days:         3,
      days_fallback:     999,
      default_term_days: None,
      terms:             HashMap::new(),
      stock_critical_kg: 50.0,
      stock_low_kg:      100.0,
    }
  }
}
