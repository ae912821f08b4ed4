//! Error types for `balance-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The subject line has too few tokens to carry an amount.
  #[error("no amount token in subject: {0:?}")]
  MissingAmount(String),

  /// The token in the amount position is not a decimal number. Recoverable:
  /// the message is skipped, never retried.
  #[error("amount token {token:?} is not a decimal number")]
  InvalidAmount { token: String },

  #[error("spend limit must be positive, got {0}")]
  NonPositiveLimit(rust_decimal::Decimal),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
