//! Inventory summary figures for the dashboard header cards.

use lomarosa_core::classify::StockLevel;
use serde::Serialize;

use crate::product::ProductRow;

/// Header-card figures. Availability is judged against the mean stock
/// across all products, not a fixed threshold.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryStats {
  pub total_productos:        usize,
  pub productos_disponibles:  usize,
  pub productos_sin_stock:    usize,
  pub stock_total_kilos:      f64,
  pub promedio_kg:            f64,
  pub productos_criticos:     usize,
  pub productos_bajo_stock:   usize,
}

pub fn compute(rows: &[ProductRow]) -> InventoryStats {
  let stock_total_kilos: f64 =
    rows.iter().map(|r| r.record.quantity).sum();
  let promedio_kg = if rows.is_empty() {
    0.0
  } else {
    stock_total_kilos / rows.len() as f64
  };

  InventoryStats {
    total_productos: rows
      .iter()
      .filter(|r| r.record.quantity > 0.0)
      .count(),
    productos_disponibles: rows
      .iter()
      .filter(|r| r.record.quantity >= promedio_kg)
      .count(),
    productos_sin_stock: rows
      .iter()
      .filter(|r| r.record.quantity < promedio_kg)
      .count(),
    stock_total_kilos,
    promedio_kg: (promedio_kg * 100.0).round() / 100.0,
    productos_criticos: rows
      .iter()
      .filter(|r| r.level == StockLevel::Critico)
      .count(),
    productos_bajo_stock: rows
      .iter()
      .filter(|r| r.level == StockLevel::Bajo)
      .count(),
  }
}
