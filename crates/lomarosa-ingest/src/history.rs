//! Sales history loading and weekly-average derivation.
//!
//! Stock coverage needs a per-product demand rate. The history source is
//! a long table of dated sale rows; we bucket by ISO week, average within
//! each week, then average the weekly means so a short spike week does
//! not dominate.

use std::collections::HashMap;

use chrono::Datelike;
use lomarosa_core::{columns::RequiredColumns, key::JoinKey};
use tracing::info;

use crate::{Result, table::Table};

const DATE_ALIASES: &[&str] = &["fecha", "dia", "día"];
const PRODUCT_ALIASES: &[&str] = &["productos", "producto"];
const QUANTITY_ALIASES: &[&str] =
  &["kg totales2", "kg totales", "kg", "cantidad", "total"];

/// Mean weekly sales per product, keyed like the inventory snapshot.
pub type WeeklyAverages = HashMap<JoinKey, f64>;

/// Rows without a date, product or quantity are silently skipped; the
/// history source is an append-only operational log and partial rows are
/// routine.
pub fn load_weekly_averages(table: &Table) -> Result<WeeklyAverages> {
  let mut required = RequiredColumns::new(&table.columns);
  let date_col = required.require("fecha", DATE_ALIASES);
  let product_col = required.require("producto", PRODUCT_ALIASES);
  let quantity_col = required.require("kg", QUANTITY_ALIASES);
  required.finish()?;

  let date_col = date_col.expect("verified by finish");
  let product_col = product_col.expect("verified by finish");
  let quantity_col = quantity_col.expect("verified by finish");

  // (product, iso year, iso week) -> (sum, count)
  let mut weekly: HashMap<(JoinKey, i32, u32), (f64, usize)> =
    HashMap::new();
  let mut used = 0usize;

  for row in &table.rows {
    let date = match table.cell(row, date_col).as_date() {
      Some(d) => d,
      None => continue,
    };
    let product = match table.cell(row, product_col).as_text() {
      Some(p) => p,
      None => continue,
    };
    let quantity = match table.cell(row, quantity_col).as_number() {
      Some(q) => q,
      None => continue,
    };

    let week = date.iso_week();
    let entry = weekly
      .entry((JoinKey::name(&product), week.year(), week.week()))
      .or_insert((0.0, 0));
    entry.0 += quantity;
    entry.1 += 1;
    used += 1;
  }

  // product -> (sum of weekly means, week count)
  let mut per_product: HashMap<JoinKey, (f64, usize)> = HashMap::new();
  for ((key, _, _), (sum, count)) in weekly {
    let weekly_mean = sum / count as f64;
    let entry = per_product.entry(key).or_insert((0.0, 0));
    entry.0 += weekly_mean;
    entry.1 += 1;
  }

  let averages: WeeklyAverages = per_product
    .into_iter()
    .map(|(key, (sum, weeks))| (key, sum / weeks as f64))
    .collect();

  info!(
    rows = used,
    products = averages.len(),
    "derived weekly sales averages"
  );

  Ok(averages)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table(csv: &str) -> Table {
    Table::from_csv_bytes(csv.as_bytes(), 0).unwrap()
  }

  #[test]
  fn averages_weekly_means_not_raw_rows() {
    // Week 1 has rows 10 and 20 (mean 15); week 2 has a single 45.
    // Average of weekly means is 30, not the raw-row mean 25.
    let t = table(
      "FECHA,PRODUCTOS,KG TOTALES2\n\
       2025-01-06,Chuleta,10\n\
       2025-01-07,Chuleta,20\n\
       2025-01-13,Chuleta,45\n",
    );
    let averages = load_weekly_averages(&t).unwrap();
    assert_eq!(averages.get(&JoinKey::name("Chuleta")), Some(&30.0));
  }

  #[test]
  fn products_are_keyed_with_name_normalization() {
    let t = table("FECHA,PRODUCTOS,KG\n2025-01-06, CHULETA ,12\n");
    let averages = load_weekly_averages(&t).unwrap();
    assert!(averages.contains_key(&JoinKey::name("chuleta")));
  }

  #[test]
  fn unreadable_rows_are_skipped() {
    let t = table(
      "FECHA,PRODUCTOS,KG\nno-date,Chuleta,10\n2025-01-06,,10\n2025-01-06,Chuleta,xx\n2025-01-06,Chuleta,8\n",
    );
    let averages = load_weekly_averages(&t).unwrap();
    assert_eq!(averages.len(), 1);
    assert_eq!(averages.get(&JoinKey::name("Chuleta")), Some(&8.0));
  }

  #[test]
  fn year_boundary_weeks_do_not_collide() {
    // ISO week 1 of 2025 vs week 1 of 2026 must stay separate buckets.
    let t = table(
      "FECHA,PRODUCTOS,KG\n2025-01-02,Lomo,10\n2026-01-02,Lomo,30\n",
    );
    let averages = load_weekly_averages(&t).unwrap();
    assert_eq!(averages.get(&JoinKey::name("Lomo")), Some(&20.0));
  }
}
