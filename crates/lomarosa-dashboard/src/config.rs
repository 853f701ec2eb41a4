//! Dashboard generation settings.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
  /// Consolidated inventory workbook.
  pub inventory_path: PathBuf,
  /// Sales history workbook; coverage columns are disabled without it.
  pub history_path:   Option<PathBuf>,
  pub output_path:    PathBuf,
  pub sheet_name:     String,
  /// Banner rows above the real header in the inventory sheet.
  pub header_offset:  usize,
  pub history_sheet:  String,
  pub title:          String,
  pub company:        String,
}

impl Default for DashboardConfig {
  fn default() -> Self {
    Self {
      inventory_path: PathBuf::from("CONSOLIDADO DIC 29.xlsx"),
      history_path:   None,
      output_path:    PathBuf::from("reports/dashboard_inventario_lomarosa.html"),
      sheet_name:     "CONSOLIDADO".into(),
      header_offset:  8,
      history_sheet:  "Sheet1".into(),
      title:          "Dashboard de Inventario - Lomarosa".into(),
      company:        "Inversiones Agropecuarias Lom SAS".into(),
    }
  }
}
