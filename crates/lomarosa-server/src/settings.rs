//! Server configuration, read from `config.toml` plus `LOMAROSA_*`
//! environment variables.

use lomarosa_core::PipelineConfig;
use lomarosa_dashboard::DashboardConfig;
use lomarosa_mail::MailConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:      String,
  pub port:      u16,
  pub mail:      MailConfig,
  pub pipeline:  PipelineConfig,
  pub dashboard: DashboardConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:      "0.0.0.0".into(),
      port:      5000,
      mail:      MailConfig::default(),
      pipeline:  PipelineConfig::default(),
      dashboard: DashboardConfig::default(),
    }
  }
}
