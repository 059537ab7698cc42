//! Error types for `goalline-core`.
//!
//! Unplayed or unparseable match records are never errors; they are dropped
//! during normalisation. Everything here is either a rejected configuration
//! or a failure of the injected match source.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("form window must be between {min} and {max}, got {got}")]
  InvalidFormWindow { got: usize, min: usize, max: usize },

  #[error("unknown streak mode: {0:?}")]
  UnknownStreakMode(String),

  #[error("unknown form perspective: {0:?}")]
  UnknownPerspective(String),

  #[error("{0} is required")]
  MissingTeam(&'static str),

  #[error("invalid {field} date: {value:?}")]
  InvalidDate { field: &'static str, value: String },

  #[error("match source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
