use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
  #[error(transparent)]
  Ingest(#[from] lomarosa_ingest::IngestError),

  #[error("could not write report: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
