//! Error types for `lomarosa-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more required columns could not be resolved in a source table.
  /// Collected in aggregate so the user sees every missing field at once.
  #[error(
    "required columns not found: {}. available columns: {}",
    missing.join(", "),
    available.join(", ")
  )]
  MissingColumns {
    missing:   Vec<String>,
    available: Vec<String>,
  },

  /// The two uploaded sources could not be told apart. Both detected roles
  /// are named because no automated recovery is reasonable here.
  #[error(
    "cannot determine which file is which: file 1 detected as {first}, file 2 detected as {second}"
  )]
  AmbiguousSources { first: String, second: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
