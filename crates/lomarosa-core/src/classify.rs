//! Classification — deterministic, total, boundary-exact mapping from
//! derived metrics to the fixed business label sets.
//!
//! Every boundary is half-open and implemented with `<` / `>=` exactly as
//! the business rules state them; `weeks == 1.0` is Advertencia, not
//! Crítico, and `weeks == 2.0` is Adecuado, not Advertencia.

use serde::{Deserialize, Serialize};

use crate::derive::{ReminderWindow, WeeksOfStock};

// ─── Invoice status ──────────────────────────────────────────────────────────

/// Urgency of an invoice inside the reminder window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  /// Already overdue (`days_to_due < 0`).
  Vencido,
  /// Due soon (`0 <= days_to_due < window`).
  Proximo,
}

impl InvoiceStatus {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Vencido => "vencido",
      Self::Proximo => "proximo",
    }
  }
}

/// Classify an invoice by days-to-due. `None` means the invoice falls
/// outside the reminder window and is excluded from the run entirely —
/// not sent, not listed, only counted.
pub fn classify_invoice(
  days_to_due: i64,
  window: &ReminderWindow,
) -> Option<InvoiceStatus> {
  if days_to_due < 0 {
    Some(InvoiceStatus::Vencido)
  } else if window.includes(days_to_due) {
    Some(InvoiceStatus::Proximo)
  } else {
    None
  }
}

// ─── Stock health (weeks of coverage) ────────────────────────────────────────

/// Coverage-based stock health, derived from [`WeeksOfStock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockHealth {
  Error,
  Agotado,
  SinDatos,
  Critico,
  Advertencia,
  Adecuado,
}

impl StockHealth {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Error => "Error",
      Self::Agotado => "Agotado",
      Self::SinDatos => "Sin datos",
      Self::Critico => "Crítico / Stock Bajo",
      Self::Advertencia => "Advertencia",
      Self::Adecuado => "OK / Stock Adecuado",
    }
  }
}

pub fn classify_coverage(weeks: WeeksOfStock) -> StockHealth {
  match weeks {
    WeeksOfStock::Error => StockHealth::Error,
    WeeksOfStock::Depleted => StockHealth::Agotado,
    WeeksOfStock::NoData => StockHealth::SinDatos,
    WeeksOfStock::Weeks(w) if w < 1.0 => StockHealth::Critico,
    WeeksOfStock::Weeks(w) if w < 2.0 => StockHealth::Advertencia,
    WeeksOfStock::Weeks(_) => StockHealth::Adecuado,
  }
}

// ─── Stock vs. weekly average ────────────────────────────────────────────────

/// Simple current-stock vs. weekly-average comparison used by the summary
/// cards: at or above the average is adequate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AverageComparison {
  StockAdecuado,
  BajoPromedio,
}

impl AverageComparison {
  pub fn label(&self) -> &'static str {
    match self {
      Self::StockAdecuado => "Stock Adecuado",
      Self::BajoPromedio => "Bajo Promedio",
    }
  }
}

pub fn compare_to_average(stock: f64, weekly_average: f64) -> AverageComparison {
  if stock >= weekly_average {
    AverageComparison::StockAdecuado
  } else {
    AverageComparison::BajoPromedio
  }
}

// ─── Absolute stock level ────────────────────────────────────────────────────

/// Absolute-kg stock banding used by the dashboard status chart, with the
/// thresholds from [`crate::config::PipelineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
  SinStock,
  Critico,
  Bajo,
  Normal,
}

impl StockLevel {
  pub fn label(&self) -> &'static str {
    match self {
      Self::SinStock => "Sin Stock",
      Self::Critico => "Crítico",
      Self::Bajo => "Bajo",
      Self::Normal => "Normal",
    }
  }
}

pub fn classify_level(quantity: f64, critical_kg: f64, low_kg: f64) -> StockLevel {
  if quantity == 0.0 {
    StockLevel::SinStock
  } else if quantity <= critical_kg {
    StockLevel::Critico
  } else if quantity <= low_kg {
    StockLevel::Bajo
  } else {
    StockLevel::Normal
  }
}
