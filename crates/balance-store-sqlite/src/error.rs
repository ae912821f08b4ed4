//! Error type for `balance-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored amount string failed to parse back into a decimal. Indicates
  /// external tampering with the database file.
  #[error("stored amount {0:?} is not a decimal")]
  AmountParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
