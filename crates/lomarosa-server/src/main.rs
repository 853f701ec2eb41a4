//! lomarosa server binary.
//!
//! `lomarosa serve` reads `config.toml` (or the path given with
//! `--config`), builds the SMTP mailer and serves the reminder API over
//! HTTP. `lomarosa dashboard` generates the static inventory report and
//! exits.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lomarosa_api::AppState;
use lomarosa_mail::SmtpMailer;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod settings;

use settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Recordatorios de cartera e inventario Lomarosa")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the reminder API (the default).
  Serve,
  /// Generate the inventory dashboard HTML and exit.
  Dashboard {
    /// Inventory workbook; overrides the configured path.
    #[arg(long)]
    inventory: Option<PathBuf>,
    /// Sales history workbook for coverage estimates.
    #[arg(long)]
    history: Option<PathBuf>,
    /// Output HTML path; overrides the configured path.
    #[arg(long)]
    output: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LOMAROSA").separator("__"))
    .build()
    .context("failed to read config")?;
  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(server_cfg).await,
    Command::Dashboard { inventory, history, output } => {
      let mut dashboard_cfg = server_cfg.dashboard;
      if let Some(path) = inventory {
        dashboard_cfg.inventory_path = path;
      }
      if let Some(path) = history {
        dashboard_cfg.history_path = Some(path);
      }
      if let Some(path) = output {
        dashboard_cfg.output_path = path;
      }

      let written =
        lomarosa_dashboard::generate(&dashboard_cfg, &server_cfg.pipeline)
          .context("failed to generate dashboard")?;
      println!("{}", written.display());
      Ok(())
    }
  }
}

async fn serve(server_cfg: ServerConfig) -> anyhow::Result<()> {
  if !server_cfg.mail.has_credentials() {
    tracing::warn!(
      "SMTP credentials not configured; /enviar-correos will be rejected"
    );
  }

  let mailer = SmtpMailer::new(&server_cfg.mail)
    .map_err(|e| anyhow::anyhow!("failed to build SMTP mailer: {e}"))?;
  let state = AppState::new(
    mailer,
    server_cfg.mail.clone(),
    server_cfg.pipeline.clone(),
  );
  let app = lomarosa_api::api_router(state);

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
