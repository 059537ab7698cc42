//! Error type for `goalline-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The document is neither an array of matches nor an object with a
  /// `matches` array.
  #[error("unexpected document shape: {0}")]
  Shape(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
