//! Static inventory dashboard generation.
//!
//! Reads the consolidated stock workbook (plus an optional sales history
//! for coverage estimates) and writes a single self-contained HTML file.

pub mod config;
pub mod error;
pub mod product;
pub mod render;
pub mod stats;

use std::path::PathBuf;

use chrono::Local;
use lomarosa_core::PipelineConfig;
use lomarosa_ingest::{SheetSelector, Table, history::load_weekly_averages};
use tracing::{info, warn};

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};

/// Run the full dashboard pipeline and write the report. Returns the
/// output path on success.
pub fn generate(
  config: &DashboardConfig,
  pipeline: &PipelineConfig,
) -> Result<PathBuf> {
  let inventory_table = Table::from_workbook_path(
    &config.inventory_path,
    &SheetSelector::Name(config.sheet_name.clone()),
    config.header_offset,
  )?;
  let (records, diag) =
    lomarosa_ingest::inventory::load_inventory(&inventory_table)?;
  info!(products = diag.loaded, "loaded inventory snapshot");

  // Coverage falls back to NoData everywhere when the history file is
  // absent or unreadable; the dashboard still renders.
  let averages = match &config.history_path {
    Some(path) => {
      match Table::from_workbook_path(
        path,
        &SheetSelector::Name(config.history_sheet.clone()),
        0,
      )
      .and_then(|t| load_weekly_averages(&t))
      {
        Ok(averages) => averages,
        Err(err) => {
          warn!(error = %err, "history unavailable, coverage disabled");
          Default::default()
        }
      }
    }
    None => Default::default(),
  };

  let rows = product::build_rows(records, &averages, pipeline);
  let inventory_stats = stats::compute(&rows);
  let html = render::render(
    &rows,
    &inventory_stats,
    config,
    &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
  );

  if let Some(parent) = config.output_path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&config.output_path, html)?;
  info!(path = %config.output_path.display(), "dashboard written");
  Ok(config.output_path.clone())
}
