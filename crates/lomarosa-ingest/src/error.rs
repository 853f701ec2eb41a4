//! Error types for `lomarosa-ingest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
  #[error("cannot read workbook: {0}")]
  Workbook(#[from] calamine::Error),

  #[error("cannot read xlsx data: {0}")]
  Xlsx(#[from] calamine::XlsxError),

  #[error("cannot read csv data: {0}")]
  Csv(#[from] csv::Error),

  #[error("worksheet not found: {0}")]
  SheetNotFound(String),

  #[error("no header row at offset {offset} (source has {rows} rows)")]
  NoHeaderRow { offset: usize, rows: usize },

  #[error(transparent)]
  Core(#[from] lomarosa_core::Error),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
