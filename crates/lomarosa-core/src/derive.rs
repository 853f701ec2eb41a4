//! Temporal and quantity derivation — the arithmetic between the join and
//! the classifier.
//!
//! Two parallel algorithms, each producing one scalar per joined record:
//! the due-window variant (payment terms → due date → days-to-due) for the
//! mailer, and the stock-coverage variant (stock ÷ weekly average → weeks
//! of stock) for the dashboard.
//!
//! `today` is always an argument, never read from the clock here, so runs
//! are reproducible and testable.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::PipelineConfig;

// ─── Payment terms ───────────────────────────────────────────────────────────

/// Maps payment-term strings ("contado", "30 días", …) to credit days.
///
/// Lookup is trimmed and case-folded. An unknown term resolves to the
/// configured default; with no default configured the caller drops and
/// counts the record — an unmapped term must never silently become 0 days.
#[derive(Debug, Clone)]
pub struct TermTable {
  map:          HashMap<String, i64>,
  default_days: Option<i64>,
}

impl TermTable {
  /// The built-in table, covering the term phrases seen in the supplier
  /// sheets. Accents are listed both ways ("días"/"dias").
  pub fn builtin() -> Self {
    let entries: &[(&str, i64)] = &[
      ("contado", 0),
      ("contado.", 0),
      ("de contado", 0),
      ("contado contraentrega", 0),
      ("8 días", 8),
      ("8 dias", 8),
      ("15 días", 15),
      ("15 dias", 15),
      ("20 días", 20),
      ("20 dias", 20),
      ("veinte dias", 20),
      ("30 días", 30),
      ("30 dias", 30),
      ("45 días", 45),
      ("45 dias", 45),
      ("60 días", 60),
      ("60 dias", 60),
    ];
    Self {
      map:          entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
      default_days: None,
    }
  }

  /// Built-in table extended/overridden by the configured entries and
  /// default.
  pub fn from_config(config: &PipelineConfig) -> Self {
    let mut table = Self::builtin();
    for (term, days) in &config.terms {
      table.map.insert(term.trim().to_lowercase(), *days);
    }
    table.default_days = config.default_term_days;
    table
  }

  /// The configured fallback, applied when a contact carries no term text
  /// at all.
  pub fn default_days(&self) -> Option<i64> {
    self.default_days
  }

  /// Credit days for a term string; `None` when the term is unknown and no
  /// default is configured. Callers log and count that case.
  pub fn days_for(&self, term: &str) -> Option<i64> {
    let normalized = term.trim().to_lowercase();
    match self.map.get(&normalized) {
      Some(days) => Some(*days),
      None => {
        if self.default_days.is_some() {
          tracing::warn!(term = %term, "unrecognized payment term, using configured default");
        }
        self.default_days
      }
    }
  }
}

// ─── Due-window variant ──────────────────────────────────────────────────────

/// Due date and reminder date computed from an issue date and credit days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueSchedule {
  pub due_date:      NaiveDate,
  pub reminder_date: NaiveDate,
}

/// `due = issue + term_days`; `reminder = due - lead_days`.
pub fn due_schedule(
  issue_date: NaiveDate,
  term_days: i64,
  lead_days: i64,
) -> DueSchedule {
  let due_date = issue_date + chrono::Duration::days(term_days);
  DueSchedule {
    due_date,
    reminder_date: due_date - chrono::Duration::days(lead_days),
  }
}

/// Whole days from `today` to `due` — negative when overdue.
pub fn days_to_due(due: NaiveDate, today: NaiveDate) -> i64 {
  (due - today).num_days()
}

/// The half-open reminder window: a record is eligible iff
/// `days_to_due < upper_bound`. One rule captures both near-due and
/// already-overdue invoices; `days_to_due >= upper_bound` means excluded
/// from the run entirely, not reclassified.
#[derive(Debug, Clone, Copy)]
pub struct ReminderWindow {
  pub upper_bound: i64,
}

impl ReminderWindow {
  pub fn includes(&self, days_to_due: i64) -> bool {
    days_to_due < self.upper_bound
  }
}

// ─── Stock-coverage variant ──────────────────────────────────────────────────

/// Weeks of stock coverage, or one of the sentinel states.
///
/// Sentinels are mutually exclusive and distinct from every valid numeric
/// value; the evaluation order in [`weeks_of_stock`] is part of the
/// contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeeksOfStock {
  /// Negative (or non-finite) stock: a data-integrity problem, never a
  /// valid business state.
  Error,
  /// Stock is exactly zero. Takes precedence over missing sales data: a
  /// depleted item is depleted regardless of whether we know its velocity.
  Depleted,
  /// No usable weekly-average sales: missing, zero, negative (history
  /// sheets carry negative kg correction rows) or not a number.
  NoData,
  /// Coverage in weeks, rounded to one decimal.
  Weeks(f64),
}

/// `stock / weekly_average`, with sentinel branches evaluated in priority
/// order: Error, then Depleted, then NoData, then the quotient.
pub fn weeks_of_stock(stock: f64, weekly_average: Option<f64>) -> WeeksOfStock {
  if !stock.is_finite() || stock < 0.0 {
    return WeeksOfStock::Error;
  }
  if stock == 0.0 {
    return WeeksOfStock::Depleted;
  }
  match weekly_average {
    Some(avg) if avg.is_finite() && avg > 0.0 => {
      WeeksOfStock::Weeks((stock / avg * 10.0).round() / 10.0)
    }
    _ => WeeksOfStock::NoData,
  }
}
