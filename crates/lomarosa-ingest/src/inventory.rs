//! Inventory snapshot loading from the consolidated stock report.
//!
//! The source workbook buries its header under several banner rows, so
//! callers pass the configured header offset along.

use lomarosa_core::{columns::RequiredColumns, record::StockRecord};
use tracing::info;

use crate::{Result, table::Table};

const CODE_ALIASES: &[&str] = &["codig", "codigo", "código"];
const PRODUCT_ALIASES: &[&str] = &["productos", "producto"];
const QUANTITY_ALIASES: &[&str] = &["total", "cantidad", "kg"];
const UNIT_ALIASES: &[&str] = &["u/m", "unidad"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryDiagnostics {
  pub total_rows: usize,
  pub loaded:     usize,
  pub skipped:    usize,
}

/// Load stock rows. Rows without a product name (including literal "nan"
/// spillover from upstream exports) are skipped; a missing quantity reads
/// as zero stock rather than an error.
pub fn load_inventory(
  table: &Table,
) -> Result<(Vec<StockRecord>, InventoryDiagnostics)> {
  let mut required = RequiredColumns::new(&table.columns);
  let product_col = required.require("producto", PRODUCT_ALIASES);
  let quantity_col = required.require("total", QUANTITY_ALIASES);
  let code_col = required.optional(CODE_ALIASES);
  let unit_col = required.optional(UNIT_ALIASES);
  required.finish()?;

  let product_col = product_col.expect("verified by finish");
  let quantity_col = quantity_col.expect("verified by finish");

  let mut records = Vec::new();
  let mut diag = InventoryDiagnostics::default();

  for row in &table.rows {
    diag.total_rows += 1;

    let product = match table.cell(row, product_col).as_text() {
      Some(p) if !p.eq_ignore_ascii_case("nan") => p,
      _ => {
        diag.skipped += 1;
        continue;
      }
    };

    let quantity =
      table.cell(row, quantity_col).as_number().unwrap_or(0.0);

    let code = code_col
      .and_then(|c| table.cell(row, c).as_text())
      .unwrap_or_default();

    let unit = unit_col.and_then(|c| table.cell(row, c).as_text());

    records.push(StockRecord { code, product, quantity, unit });
  }

  diag.loaded = records.len();
  info!(
    total = diag.total_rows,
    loaded = diag.loaded,
    skipped = diag.skipped,
    "loaded inventory snapshot"
  );

  Ok((records, diag))
}
