//! Error type for `balance-gateway`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{service} returned status {status}")]
  Status { service: &'static str, status: u16 },

  /// The oracle answered with an empty or unusable completion.
  #[error("empty completion from classification oracle")]
  EmptyCompletion,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
