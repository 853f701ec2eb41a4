//! Per-product enrichment: family, stock level, coverage and health.

use lomarosa_core::{
  PipelineConfig,
  classify::{
    AverageComparison, StockHealth, StockLevel, classify_coverage,
    classify_level, compare_to_average,
  },
  derive::{WeeksOfStock, weeks_of_stock},
  key::JoinKey,
  record::StockRecord,
};
use lomarosa_ingest::history::WeeklyAverages;

/// One fully-derived dashboard row.
#[derive(Debug, Clone)]
pub struct ProductRow {
  pub record:         StockRecord,
  pub family:         &'static str,
  pub level:          StockLevel,
  pub weekly_average: Option<f64>,
  pub coverage:       WeeksOfStock,
  pub health:         StockHealth,
  pub vs_average:     Option<AverageComparison>,
}

/// Product family from the name, for grouping. Keyword order matters:
/// "COSTILOMO" must land in Costillas before any broader match.
pub fn family(name: &str) -> &'static str {
  let upper = name.to_uppercase();
  if upper.contains("CHULETA") {
    "Chuletas"
  } else if upper.contains("COSTILLA") || upper.contains("COSTILOMO") {
    "Costillas"
  } else if upper.contains("CANASTO") {
    "Canastos"
  } else if upper.contains("MERMA") {
    "Mermas"
  } else if upper.contains("SILLA") {
    "Sillas"
  } else if upper.contains("SPARRY") {
    "Sparry"
  } else if upper.contains("MATAMBRITO") {
    "Matambrito"
  } else if upper.contains("COSTIPIEL") {
    "Costipiel"
  } else {
    "Otros"
  }
}

pub fn build_rows(
  records: Vec<StockRecord>,
  averages: &WeeklyAverages,
  config: &PipelineConfig,
) -> Vec<ProductRow> {
  records
    .into_iter()
    .map(|record| {
      let weekly_average =
        averages.get(&JoinKey::name(&record.product)).copied();
      let coverage = weeks_of_stock(record.quantity, weekly_average);
      ProductRow {
        family: family(&record.product),
        level: classify_level(
          record.quantity,
          config.stock_critical_kg,
          config.stock_low_kg,
        ),
        weekly_average,
        coverage,
        health: classify_coverage(coverage),
        vs_average: weekly_average
          .map(|avg| compare_to_average(record.quantity, avg)),
        record,
      }
    })
    .collect()
}
