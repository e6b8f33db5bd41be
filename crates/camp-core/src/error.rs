//! Error types for `camp-core`.

use thiserror::Error;

/// Validation failures raised before anything is staged for persistence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("{0} is required")]
  Required(&'static str),

  #[error("length must not be negative (got {0})")]
  NegativeLength(i32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
